//! # Skyarc Archive
//!
//! Service discovery and query submission for VO archives.
//!
//! ## Features
//!
//! - **Lazy endpoint resolution**: per-role service URLs derived from the
//!   archive base URL once per client, with failures never cached
//! - **Typed service handles**: TAP, SIA, and datalink clients bound to
//!   their resolved URLs
//! - **Constraint queries**: high-level search built on `skyarc-adql`
//!
//! ## Example
//!
//! ```rust,no_run
//! use skyarc_adql::ConstraintSet;
//! use skyarc_archive::{ArchiveClient, ArchiveConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ArchiveConfig::with_archive_url("https://archive.example.org");
//!     let client = ArchiveClient::new(&config)?;
//!
//!     let constraints = ConstraintSet::new()
//!         .with("ra_dec", "10.5, 20.3, 0.1")
//!         .with("public", true);
//!
//!     let votable = client.query(&constraints, Some(100)).await?;
//!     println!("{}", votable);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod services;

pub use archive::ArchiveClient;
pub use config::ArchiveConfig;
pub use endpoints::{BaseUrlProvider, ConfiguredBaseUrl, EndpointResolver, ServiceRole};
pub use error::{ArchiveError, ArchiveResult};
pub use services::{DatalinkService, SiaService, TapService};

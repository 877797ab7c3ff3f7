//! # Skyarc ADQL
//!
//! Constraint-to-query translation for ObsCore tabular archives.
//!
//! ## Features
//!
//! - **Field registry**: flat lookup from logical search fields to ObsCore
//!   columns, grouped into categories for help output
//! - **Composable encoders**: per-field value encoding with OR alternatives
//!   and numeric/date range grammar
//! - **Strict validation**: unrecognized constraints are collected across
//!   the whole set and reported together, never one at a time
//!
//! ## Example
//!
//! ```rust
//! use skyarc_adql::{ConstraintSet, QueryCompiler};
//!
//! let constraints = ConstraintSet::new()
//!     .with("ra_dec", "10.5, 20.3, 0.1")
//!     .with("spatial_resolution", "<0.2");
//!
//! let query = QueryCompiler::new().compile(&constraints)?;
//! assert!(query.starts_with("select * from tap_schema.obscore WHERE "));
//! # Ok::<(), skyarc_adql::CompileError>(())
//! ```

pub mod compile;
pub mod encode;
pub mod error;
pub mod fields;

pub use compile::{ConstraintSet, QueryCompiler, OBSCORE_BASE_QUERY};
pub use error::{CompileError, EncodeError};
pub use fields::{FieldCategory, FieldEntry, FieldRegistry};

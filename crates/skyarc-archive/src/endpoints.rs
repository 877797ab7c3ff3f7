//! Lazy service-endpoint resolution.
//!
//! An archive exposes several sub-services under a common base URL. The
//! resolver fetches the base URL at most once per role per instance, joins
//! the per-role path suffix onto it, and caches the result for the
//! instance's lifetime. Failures propagate with role context and are not
//! cached, so a later call retries.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::OnceCell;

use crate::error::{ArchiveError, ArchiveResult};

/// Sub-services reachable under an archive base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceRole {
    /// Table access (TAP, synchronous ADQL queries).
    TableAccess,
    /// Image access (SIA).
    ImageAccess,
    /// Datalink (link-follow) service.
    Datalink,
}

impl ServiceRole {
    /// All roles, in resolution-table order.
    pub const ALL: [ServiceRole; 3] = [Self::TableAccess, Self::ImageAccess, Self::Datalink];

    /// Path suffix joined onto the archive base URL for this role.
    pub fn path_suffix(self) -> &'static str {
        match self {
            Self::TableAccess => "tap",
            Self::ImageAccess => "sia",
            Self::Datalink => "datalink",
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TableAccess => "table-access",
            Self::ImageAccess => "image-access",
            Self::Datalink => "datalink",
        };
        f.write_str(name)
    }
}

/// Source of the archive base URL.
///
/// Implementations may hit the network; timeout and retry policy belong to
/// the provider, not the resolver.
#[async_trait]
pub trait BaseUrlProvider: Send + Sync {
    /// Return the archive base URL.
    async fn base_url(&self) -> anyhow::Result<String>;
}

/// Provider returning a configured, fixed archive URL.
#[derive(Debug, Clone)]
pub struct ConfiguredBaseUrl {
    url: String,
}

impl ConfiguredBaseUrl {
    /// Provider over a fixed URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl BaseUrlProvider for ConfiguredBaseUrl {
    async fn base_url(&self) -> anyhow::Result<String> {
        Ok(self.url.clone())
    }
}

/// Per-role cache of derived service URLs.
///
/// Each role resolves at most once per resolver instance. Concurrent first
/// access is serialized per slot, so the provider is invoked exactly once
/// per successfully resolved role.
pub struct EndpointResolver<P> {
    provider: P,
    tap_url: OnceCell<String>,
    sia_url: OnceCell<String>,
    datalink_url: OnceCell<String>,
}

impl<P: BaseUrlProvider> EndpointResolver<P> {
    /// Resolver over a base-URL provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            tap_url: OnceCell::new(),
            sia_url: OnceCell::new(),
            datalink_url: OnceCell::new(),
        }
    }

    /// Resolve (or return the cached) URL for a service role.
    ///
    /// Provider failures leave the slot empty, so a later call retries. A
    /// failure on one role never invalidates another role's cached URL.
    pub async fn url(&self, role: ServiceRole) -> ArchiveResult<&str> {
        let cell = match role {
            ServiceRole::TableAccess => &self.tap_url,
            ServiceRole::ImageAccess => &self.sia_url,
            ServiceRole::Datalink => &self.datalink_url,
        };
        cell.get_or_try_init(|| async move {
            let base = self.provider.base_url().await.map_err(|source| {
                tracing::debug!("error getting the archive URL for {}: {}", role, source);
                ArchiveError::EndpointResolution { role, source }
            })?;
            Ok(join_url(&base, role.path_suffix()))
        })
        .await
        .map(String::as_str)
    }
}

/// Join an archive base URL and a service path suffix.
///
/// Base URLs are bare origins or an origin plus a fixed prefix, so plain
/// suffix appending is sufficient.
fn join_url(base: &str, suffix: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), suffix)
}

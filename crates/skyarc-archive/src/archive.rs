//! High-level archive client.
//!
//! Composes the constraint compiler with lazy endpoint resolution: service
//! handles are created on first use and cached for the client's lifetime.

use std::time::Duration;

use skyarc_adql::{ConstraintSet, QueryCompiler};
use tokio::sync::OnceCell;

use crate::config::ArchiveConfig;
use crate::endpoints::{BaseUrlProvider, ConfiguredBaseUrl, EndpointResolver, ServiceRole};
use crate::error::ArchiveResult;
use crate::services::{DatalinkService, SiaService, TapService};

/// Client for a VO archive exposing TAP, SIA, and datalink sub-services.
pub struct ArchiveClient<P = ConfiguredBaseUrl> {
    http: reqwest::Client,
    endpoints: EndpointResolver<P>,
    compiler: QueryCompiler,
    tap: OnceCell<TapService>,
    sia: OnceCell<SiaService>,
    datalink: OnceCell<DatalinkService>,
}

impl ArchiveClient<ConfiguredBaseUrl> {
    /// Client over the archive URL named in the configuration.
    pub fn new(config: &ArchiveConfig) -> ArchiveResult<Self> {
        config.validate()?;
        Self::with_provider(ConfiguredBaseUrl::new(config.archive_url.clone()), config)
    }
}

impl<P: BaseUrlProvider> ArchiveClient<P> {
    /// Client over a custom base-URL provider.
    pub fn with_provider(provider: P, config: &ArchiveConfig) -> ArchiveResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            http,
            endpoints: EndpointResolver::new(provider),
            compiler: QueryCompiler::new(),
            tap: OnceCell::new(),
            sia: OnceCell::new(),
            datalink: OnceCell::new(),
        })
    }

    /// Lazily constructed TAP handle.
    pub async fn tap(&self) -> ArchiveResult<&TapService> {
        self.tap
            .get_or_try_init(|| async {
                let url = self.endpoints.url(ServiceRole::TableAccess).await?;
                Ok(TapService::new(self.http.clone(), url.to_string()))
            })
            .await
    }

    /// Lazily constructed SIA handle.
    pub async fn sia(&self) -> ArchiveResult<&SiaService> {
        self.sia
            .get_or_try_init(|| async {
                let url = self.endpoints.url(ServiceRole::ImageAccess).await?;
                Ok(SiaService::new(url.to_string()))
            })
            .await
    }

    /// Lazily constructed datalink handle.
    pub async fn datalink(&self) -> ArchiveResult<&DatalinkService> {
        self.datalink
            .get_or_try_init(|| async {
                let url = self.endpoints.url(ServiceRole::Datalink).await?;
                Ok(DatalinkService::new(url.to_string()))
            })
            .await
    }

    /// Compile a constraint set into ADQL without submitting it.
    pub fn compiled_query(&self, constraints: &ConstraintSet) -> ArchiveResult<String> {
        Ok(self.compiler.compile(constraints)?)
    }

    /// Compile and submit a constraint set; returns the raw TAP response.
    pub async fn query(
        &self,
        constraints: &ConstraintSet,
        maxrec: Option<u64>,
    ) -> ArchiveResult<String> {
        let query = self.compiler.compile(constraints)?;
        tracing::debug!("TAP query: {}", query);
        self.tap().await?.search(&query, maxrec).await
    }

    /// Query by source name, merged into any additional constraints.
    pub async fn query_object(
        &self,
        object_name: &str,
        constraints: Option<ConstraintSet>,
        maxrec: Option<u64>,
    ) -> ArchiveResult<String> {
        let mut constraints = constraints.unwrap_or_default();
        constraints.set("source_name", object_name);
        self.query(&constraints, maxrec).await
    }

    /// Query a sky region given a pre-stringified `ra, dec, radius` in
    /// degrees, OR-merged with any previous region constraint.
    pub async fn query_region(
        &self,
        position: &str,
        constraints: Option<ConstraintSet>,
        maxrec: Option<u64>,
    ) -> ArchiveResult<String> {
        let mut constraints = constraints.unwrap_or_default();
        constraints.merge_or("ra_dec", position);
        self.query(&constraints, maxrec).await
    }
}

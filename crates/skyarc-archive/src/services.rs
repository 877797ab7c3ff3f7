//! Typed handles for resolved archive sub-services.
//!
//! Handles are thin: they hold a resolved service URL and know how to shape
//! requests for it. Response parsing and table materialization are the
//! caller's concern.

use crate::error::{ArchiveError, ArchiveResult};

/// Synchronous TAP (table access) client bound to a resolved service URL.
#[derive(Debug, Clone)]
pub struct TapService {
    http: reqwest::Client,
    base_url: String,
}

impl TapService {
    pub(crate) fn new(http: reqwest::Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Resolved TAP service URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit an ADQL query to the synchronous endpoint and return the raw
    /// response body (a VOTable document).
    pub async fn search(&self, query: &str, maxrec: Option<u64>) -> ArchiveResult<String> {
        let mut form: Vec<(&str, String)> = vec![
            ("REQUEST", "doQuery".to_string()),
            ("LANG", "ADQL".to_string()),
            ("QUERY", query.to_string()),
        ];
        if let Some(maxrec) = maxrec {
            form.push(("MAXREC", maxrec.to_string()));
        }

        let url = format!("{}/sync", self.base_url);
        let response = self.http.post(&url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ArchiveError::Service { status, body });
        }
        Ok(body)
    }
}

/// Image access (SIA) service handle.
#[derive(Debug, Clone)]
pub struct SiaService {
    base_url: String,
}

impl SiaService {
    pub(crate) fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Resolved SIA service URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query URL for a positional image search in degrees.
    pub fn query_url(&self, ra: f64, dec: f64, size: f64) -> String {
        format!("{}?POS={},{}&SIZE={}", self.base_url, ra, dec, size)
    }
}

/// Datalink (link-follow) service handle.
#[derive(Debug, Clone)]
pub struct DatalinkService {
    base_url: String,
}

impl DatalinkService {
    pub(crate) fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Resolved datalink service URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL listing the links available for a dataset identifier.
    pub fn links_url(&self, id: &str) -> String {
        format!("{}?ID={}", self.base_url, urlencoding::encode(id))
    }
}

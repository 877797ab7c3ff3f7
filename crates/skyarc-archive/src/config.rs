//! Archive client configuration.
//!
//! A plain serde component: embed it in an application config file or
//! construct it directly.

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, ArchiveResult};

/// Configuration for an archive client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Base URL of the archive hosting the TAP/SIA/datalink services.
    pub archive_url: String,
    /// Request timeout in seconds for service calls.
    pub timeout_seconds: u64,
    /// User-Agent header sent with archive requests.
    pub user_agent: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            archive_url: "https://data-query.nrao.edu/archive".to_string(),
            timeout_seconds: 60,
            user_agent: format!("skyarc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ArchiveConfig {
    /// Config pointing at a specific archive, with default timeouts.
    pub fn with_archive_url(url: impl Into<String>) -> Self {
        Self {
            archive_url: url.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ArchiveResult<()> {
        if self.archive_url.trim().is_empty() {
            return Err(ArchiveError::Config(
                "archive_url must not be empty".to_string(),
            ));
        }
        if !self.archive_url.starts_with("http://") && !self.archive_url.starts_with("https://") {
            return Err(ArchiveError::Config(format!(
                "archive_url must be an http(s) URL, got '{}'",
                self.archive_url
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ArchiveError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

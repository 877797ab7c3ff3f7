//! Error types for archive service access.

use thiserror::Error;

use crate::endpoints::ServiceRole;

/// Errors raised by archive service discovery and query submission.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The base-URL provider failed while resolving a service endpoint.
    ///
    /// The failure is surfaced with role context and is never cached; a
    /// later resolution attempt for the same role retries the provider.
    #[error("failed to resolve {role} endpoint: {source}")]
    EndpointResolution {
        /// Role whose endpoint was being resolved.
        role: ServiceRole,
        /// Underlying provider error.
        #[source]
        source: anyhow::Error,
    },

    /// Constraint compilation failed.
    #[error("query compilation failed: {0}")]
    Compile(#[from] skyarc_adql::CompileError),

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Service {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Response body, typically a VOTable error document.
        body: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

//! Error taxonomy shared by the pipeline, the adapters and the web layer

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("unsupported domain: {0}")]
    UnsupportedDomain(String),

    #[error("could not extract share id from: {0}")]
    ShareIdNotFound(String),

    #[error("share requires a password: {0}")]
    PasswordRequired(String),

    #[error("share not found: {0}")]
    ShareNotFound(String),

    #[error("no files found in the share")]
    NoFilesInShare,

    /// Files were listed but no download link could be minted for any of them.
    #[error("could not resolve a download link for any of {total_files} files")]
    NoLinksResolved { total_files: usize },

    #[error("upstream request timed out")]
    UpstreamTimeout,

    #[error("upstream refused the request (HTTP {0})")]
    UpstreamUnavailable(u16),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("upstream error: {0}")]
    Unknown(String),
}

impl ResolveError {
    /// HTTP status surfaced to the client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResolveError::InvalidUrl(_)
            | ResolveError::UnsupportedDomain(_)
            | ResolveError::ShareIdNotFound(_)
            | ResolveError::PasswordRequired(_) => StatusCode::BAD_REQUEST,
            ResolveError::ShareNotFound(_) | ResolveError::NoFilesInShare => StatusCode::NOT_FOUND,
            ResolveError::UpstreamTimeout | ResolveError::UpstreamUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ResolveError::NoLinksResolved { .. }
            | ResolveError::Configuration(_)
            | ResolveError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable message for the response envelope. Never contains upstream text or secrets.
    pub fn public_message(&self) -> &'static str {
        match self {
            ResolveError::InvalidUrl(_) | ResolveError::UnsupportedDomain(_) => {
                "Invalid Terabox URL. Please provide a valid Terabox sharing link."
            }
            ResolveError::ShareIdNotFound(_) => "Could not extract share ID from URL",
            ResolveError::PasswordRequired(_) => {
                "This share is password protected. Please provide the correct password."
            }
            ResolveError::ShareNotFound(_) => "Share not found or expired. Please check the URL.",
            ResolveError::NoFilesInShare => "No files found in the share.",
            ResolveError::NoLinksResolved { .. } => {
                "Could not get download links for any files. The share might be password protected or expired."
            }
            ResolveError::UpstreamTimeout => "Request timeout. Please try again.",
            ResolveError::UpstreamUnavailable(_) => {
                "Access denied by Terabox. The share might be private or the server cookie expired."
            }
            ResolveError::Configuration(_) => {
                "Server configuration error. Please contact administrator."
            }
            ResolveError::Unknown(_) => "Failed to get download link. Please try again later.",
        }
    }

    /// Whether the failure originated on the upstream side rather than in client input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ResolveError::ShareNotFound(_)
                | ResolveError::NoLinksResolved { .. }
                | ResolveError::UpstreamTimeout
                | ResolveError::UpstreamUnavailable(_)
                | ResolveError::Unknown(_)
        )
    }
}

//! Crate-wide error hierarchy for git-context-engine.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type GitContextEngineResult<T> = Result<T, GitContextEngineError>;

/// Root error type for the git-context-engine crate.
#[derive(Debug, Error)]
pub enum GitContextEngineError {
    /// GitHub API related failure.
    #[error(transparent)]
    Provider(#[from] GitContextEngineProviderError),

    /// Configuration problems (bad/missing tokens, base URL, etc.).
    #[error(transparent)]
    Config(#[from] GitContextEngineConfigError),

    /// App authentication needs an installation id and the event had none.
    #[error("installation id is required for GitHub App authentication")]
    MissingInstallationId,

    /// Input validation errors (bad owner/repo, unexpected empty data, etc.).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Provider-specific error used inside the provider layer.
#[derive(Debug, Error)]
pub enum GitContextEngineProviderError {
    /// Unauthorized (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// Forbidden (HTTP 403).
    #[error("forbidden")]
    Forbidden,

    /// Not found (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Validation failed on GitHub's side (HTTP 422).
    #[error("unprocessable entity")]
    Unprocessable,

    /// Rate limited (HTTP 429).
    #[error("rate limited")]
    RateLimited,

    /// Gateway / server error (HTTP 5xx).
    #[error("server error: status {0}")]
    Server(u16),

    /// Other HTTP status (non-2xx) not covered by specific variants.
    #[error("http status error: status {0}")]
    HttpStatus(u16),

    /// Timeout at transport level.
    #[error("timeout")]
    Timeout,

    /// Network/transport failure without HTTP status (DNS/connect/reset).
    #[error("network error: {0}")]
    Network(String),

    /// Unexpected/invalid shape of provider response.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Configuration and setup errors (base API URL, missing token, etc.).
#[derive(Debug, Error)]
pub enum GitContextEngineConfigError {
    /// Missing required credential for the selected auth mode.
    #[error("missing GitHub credential: {0}")]
    MissingCredential(&'static str),

    /// Invalid base API URL.
    #[error("invalid base api url: {0}")]
    InvalidBaseUrl(String),

    /// Unknown value for an enum-like setting.
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

// ===== Conversions for `?` ergonomics at the crate root =====

impl From<reqwest::Error> for GitContextEngineError {
    fn from(e: reqwest::Error) -> Self {
        GitContextEngineError::Provider(GitContextEngineProviderError::from(e))
    }
}

// ===== Mapping from reqwest::Error into GitContextEngineProviderError =====

impl From<reqwest::Error> for GitContextEngineProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return GitContextEngineProviderError::Timeout;
        }

        if let Some(status) = e.status() {
            return GitContextEngineProviderError::from_status(status.as_u16());
        }

        if e.is_decode() {
            return GitContextEngineProviderError::InvalidResponse(e.to_string());
        }

        GitContextEngineProviderError::Network(e.to_string())
    }
}

impl GitContextEngineProviderError {
    /// Classifies a non-2xx status code.
    pub fn from_status(code: u16) -> Self {
        match code {
            401 => GitContextEngineProviderError::Unauthorized,
            403 => GitContextEngineProviderError::Forbidden,
            404 => GitContextEngineProviderError::NotFound,
            422 => GitContextEngineProviderError::Unprocessable,
            429 => GitContextEngineProviderError::RateLimited,
            500..=599 => GitContextEngineProviderError::Server(code),
            _ => GitContextEngineProviderError::HttpStatus(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_classified() {
        assert!(matches!(
            GitContextEngineProviderError::from_status(401),
            GitContextEngineProviderError::Unauthorized
        ));
        assert!(matches!(
            GitContextEngineProviderError::from_status(502),
            GitContextEngineProviderError::Server(502)
        ));
        assert!(matches!(
            GitContextEngineProviderError::from_status(409),
            GitContextEngineProviderError::HttpStatus(409)
        ));
    }
}

//! Error types for the Open Legislation client.
//!
//! # Design
//! Three kinds of failure reach the caller. `Configuration` is raised while a
//! query or client is being assembled, before any request exists. Transport
//! failures (`Transport` for a non-2xx status, `Connection` when the round-trip
//! itself failed) come from executing a request. `Parse` means the body was
//! not XML at all. Missing optional fields inside a bill are not errors.

use thiserror::Error;

/// An invalid parameter supplied while building a query or client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("page size ({0}) must be between 1 and 99")]
    PageSize(i64),

    #[error("page number ({0}) must be a positive integer")]
    Page(i64),

    #[error("{0} is not a supported get type")]
    GetType(String),

    #[error("{0} is not a supported search type")]
    SearchType(String),

    #[error("format {0} is not supported")]
    Format(String),

    #[error("version {0} is not supported")]
    Version(String),

    #[error("document id must not be empty")]
    EmptyId,

    /// A search with no type, filter, or text clause.
    #[error("search has no term, filter, or type to match on")]
    EmptySearch,

    /// The configuration document itself could not be read.
    #[error("invalid client configuration: {0}")]
    Document(String),
}

/// Errors returned by `OpenLegClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} returned for {url}")]
    Transport { status: u16, url: String, body: String },

    /// The request never produced a response.
    #[error("request to {url} failed: {message}")]
    Connection { url: String, message: String },

    /// The body could not be read as an XML document.
    #[error("response is not a readable document: {0}")]
    Parse(String),
}

impl ApiError {
    /// True for both transport variants.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Connection { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_api_error() {
        let err: ApiError = ConfigError::PageSize(100).into();
        assert!(matches!(err, ApiError::Configuration(ConfigError::PageSize(100))));
        assert_eq!(err.to_string(), "page size (100) must be between 1 and 99");
    }

    #[test]
    fn transport_kinds_are_grouped() {
        let status = ApiError::Transport {
            status: 500,
            url: "http://x".to_string(),
            body: String::new(),
        };
        let conn = ApiError::Connection {
            url: "http://x".to_string(),
            message: "refused".to_string(),
        };
        assert!(status.is_transport());
        assert!(conn.is_transport());
        assert!(!ApiError::Parse("bad".to_string()).is_transport());
    }
}

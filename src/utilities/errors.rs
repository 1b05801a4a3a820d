//! Error types for moodlift.
//!
//! Only [`CatalogError`] ever reaches a pipeline caller. Generation and
//! parse failures are folded into a [`crate::response::GenerationResult`]
//! at the pipeline boundary.

use thiserror::Error;

/// Catalog lookup or construction failure.
///
/// Lookups only ever receive catalog-sourced keys, so `UnknownKey` signals a
/// programming error rather than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The key is not a member of the named catalog.
    #[error("unknown {catalog} key: {key:?}")]
    UnknownKey { catalog: &'static str, key: String },

    /// Two entries share a key (case-insensitive).
    #[error("duplicate {catalog} key: {key:?}")]
    DuplicateKey { catalog: &'static str, key: String },

    /// The key is reserved and cannot name a catalog entry.
    #[error("reserved {catalog} key: {key:?}")]
    ReservedKey { catalog: &'static str, key: String },
}

impl CatalogError {
    pub fn unknown(catalog: &'static str, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            catalog,
            key: key.into(),
        }
    }
}

/// Failures of the outbound generation call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No API key was configured for the selected provider.
    #[error("API key not set for provider '{provider}'")]
    MissingApiKey { provider: String },

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The service answered with a body that could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The service answered successfully but produced no text.
    #[error("service returned an empty response")]
    EmptyResponse,

    /// The operation is not implemented by this generator.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// A structured-advice payload that did not decode.
///
/// Raised by the strict parse stage and consumed by the plain-text fallback.
#[derive(Debug, Clone, Error)]
#[error("malformed structured response: {message}")]
pub struct MalformedStructuredResponse {
    pub message: String,
}

impl MalformedStructuredResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure writing an exported document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    EmptyDocument,

    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("failed to read catalog file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("catalog file '{path}' is invalid: {message}")]
    Invalid { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_message() {
        let err = CatalogError::unknown("persona", "Wizard");
        assert_eq!(err.to_string(), "unknown persona key: \"Wizard\"");
    }

    #[test]
    fn test_duplicate_and_reserved_messages() {
        let dup = CatalogError::DuplicateKey {
            catalog: "persona",
            key: "coach".into(),
        };
        assert_eq!(dup.to_string(), "duplicate persona key: \"coach\"");
        let reserved = CatalogError::ReservedKey {
            catalog: "persona",
            key: "User".into(),
        };
        assert_eq!(reserved.to_string(), "reserved persona key: \"User\"");
    }

    #[test]
    fn test_api_error_message() {
        let err = GenerationError::Api {
            status: 429,
            body: "slow down".into(),
        };
        assert_eq!(err.to_string(), "API error (429): slow down");
    }
}

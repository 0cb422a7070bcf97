//! Error types for certificate generation

use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating certificates
#[derive(Error, Debug)]
pub enum Error {
    /// The remote concept generator failed or returned unusable content.
    ///
    /// The concept provider recovers from this internally; it is exposed so
    /// callers of the raw request path can inspect what went wrong.
    #[error("Concept generation failed: {0}")]
    ConceptGeneration(String),

    /// Failed to load or decode an asset
    #[error("Failed to load asset {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    /// Failed to render a certificate
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// The category name was empty after trimming
    #[error("Please enter a category name")]
    InvalidCategory,
}

impl Error {
    pub(crate) fn asset(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(feature = "remote")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConceptGeneration(format!("invalid JSON: {}", err))
    }
}

use thiserror::Error;

/// Error types for machine translation calls
///
/// Every variant is a translation failure as far as the pipeline is
/// concerned: the deep chain absorbs them, the shallow round trip reports
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtError {
    /// The backend returned an error or an unusable response
    #[error("Translation error: {0}")]
    TranslationError(String),
    /// The request never reached the backend
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Provider misconfiguration (missing key, rejected credentials)
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Malformed language code
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),
    /// The call did not finish within the configured timeout
    #[error("Translation timed out after {0} ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        MtError::NetworkError(err.to_string())
    }
}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;

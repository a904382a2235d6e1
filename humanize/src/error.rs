use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a lexical database.
///
/// Lookups themselves never fail: a word without synonyms is a normal
/// outcome and yields an empty candidate list.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// A database file could not be read
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A database file was readable but malformed
    #[error("malformed lexical data in '{path}' at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// A JSON lexicon file could not be decoded
    #[error("invalid JSON lexicon '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Loading succeeded but produced no synonym groups
    #[error("lexical database at '{0}' contains no synonym sets")]
    Empty(PathBuf),
}

/// Result type for lexicon loading
pub type LexiconResult<T> = Result<T, LexiconError>;

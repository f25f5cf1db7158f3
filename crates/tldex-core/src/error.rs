//! Error types for rule loading and host/URL parsing.

/// Errors surfaced by the rule store and the parsers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule text was empty or contained no parsable rule.
    #[error("rule list contains no parsable rules")]
    Format,
    /// Rule file could not be read.
    #[error("failed to read rule list: {0}")]
    Io(#[from] std::io::Error),
    /// Host input was empty after normalization.
    #[error("empty host")]
    InvalidHost,
    /// Port segment was present but not a usable port number.
    #[error("invalid port segment: {0:?}")]
    InvalidPort(String),
    /// Failure from the caller-supplied fetch collaborator, passed through
    /// unchanged so callers can tell "fetch failed" from "list malformed".
    #[error(transparent)]
    Fetch(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

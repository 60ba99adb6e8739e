//! Error types for init data handling.

use thiserror::Error;

/// Errors surfaced by init data constructors.
///
/// Resolution itself never fails: an unresolvable payload is `None`.
#[derive(Debug, Error)]
pub enum InitDataError {
    /// Value lacks `hash=` or `auth_date=`.
    #[error("init data must contain hash= and auth_date=")]
    Invalid,

    /// Launch URL could not be parsed.
    #[error("invalid launch url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type for init data operations.
pub type Result<T> = std::result::Result<T, InitDataError>;

//! Error types for `LuauSyntax`

use thiserror::Error;

/// The error type for grammar construction.
///
/// Tokenizing never fails: text a rule cannot match is emitted as plain text.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A rule expression failed to compile.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The expression as written in the rule table.
        pattern: String,
        /// The underlying regex compilation error.
        source: regex::Error,
    },
}

/// Result type for `LuauSyntax` operations.
pub type Result<T> = std::result::Result<T, Error>;

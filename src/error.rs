//! Error types for filename decoding and TextGrid reading

use thiserror::Error;

/// Result type alias for TextGrid reading operations
pub type TextGridResult<T> = Result<T, TextGridError>;

/// Errors raised while decoding metadata from a file name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("file name {file_name:?} is too short: expected at least {expected} characters, found {found}")]
    TooShort {
        file_name: String,
        expected: usize,
        found: usize,
    },

    #[error("file name {0:?} does not match <corpus>_<session>_<speaker> naming")]
    Malformed(String),
}

/// Errors raised while reading a TextGrid file
#[derive(Error, Debug)]
pub enum TextGridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid text encoding: {0}")]
    Encoding(String),

    #[error("not a text TextGrid file: {0}")]
    NotTextGrid(String),

    #[error("unexpected end of file while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("line {line}: expected {expected}, found {found}")]
    Unexpected {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {0}: unterminated string literal")]
    UnterminatedString(usize),

    #[error("unknown tier class {0:?}")]
    UnknownTierClass(String),

    #[error("TextGrid has no tiers")]
    NoTiers,

    #[error("tier {0:?} not found")]
    TierNotFound(String),

    #[error("tier {0:?} is a point tier, not an interval tier")]
    NotIntervalTier(String),
}

//! Error types for quire.

use thiserror::Error;

/// Primary error type for boundary conversions and constant lookups.
#[derive(Error, Debug)]
pub enum QuireError {
    /// Input bytes are not well-formed UTF-8.
    ///
    /// `valid_up_to` is the length of the longest valid prefix. `error_len`
    /// is the length of the invalid sequence, or `None` when the input ends
    /// in the middle of a multi-byte sequence.
    #[error("invalid utf-8 at byte {valid_up_to}{}", fmt_error_len(.error_len))]
    Encoding {
        valid_up_to: usize,
        error_len: Option<usize>,
    },

    #[error("unpaired surrogate {unit:#06x} at code unit {index}")]
    UnpairedSurrogate { unit: u16, index: usize },

    #[error("character {ch:?} at position {index} is not representable in latin-1")]
    NotLatin1 { ch: char, index: usize },

    #[error("rotation must be a multiple of 90 degrees, got {0}")]
    InvalidRotation(i64),

    #[error("unknown {kind} name: {name}")]
    UnknownName { kind: &'static str, name: String },

    #[error("duplicate exported name: {0}")]
    DuplicateName(String),

    #[error("duplicate value {value} in {table}: {name}")]
    DuplicateValue {
        table: &'static str,
        name: &'static str,
        value: i64,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn fmt_error_len(error_len: &Option<usize>) -> String {
    match error_len {
        Some(n) => format!(" ({n} invalid byte{})", if *n == 1 { "" } else { "s" }),
        None => " (truncated sequence)".to_string(),
    }
}

impl From<std::str::Utf8Error> for QuireError {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Encoding {
            valid_up_to: err.valid_up_to(),
            error_len: err.error_len(),
        }
    }
}

impl QuireError {
    /// Whether this error came from malformed text rather than a bad name or I/O.
    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Self::Encoding { .. } | Self::UnpairedSurrogate { .. } | Self::NotLatin1 { .. }
        )
    }
}

/// Convenience Result type alias for QuireError.
pub type Result<T> = std::result::Result<T, QuireError>;

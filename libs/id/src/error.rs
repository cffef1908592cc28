//! Error types for base36 coding and identifier parsing.

use thiserror::Error;

/// Errors that can occur when coding base36 values or parsing identifiers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Digit value outside the encodable `0..=35` range.
    #[error("base36 digit out of range: {0}")]
    DigitRange(u8),

    /// Character outside the base36 alphabet.
    ///
    /// Lowercase letters are rejected; the alphabet is `0-9A-Z` only.
    #[error("invalid base36 digit: {0:?}")]
    InvalidDigit(char),

    /// Identifier too short or ill-formed to carry a timestamp.
    #[error("malformed identifier: {reason}")]
    Malformed {
        /// What the parser was missing.
        reason: &'static str,
    },
}

impl IdError {
    /// Returns true if this error came from parsing an identifier rather
    /// than from a codec call.
    pub fn is_malformed(&self) -> bool {
        matches!(self, IdError::Malformed { .. })
    }
}

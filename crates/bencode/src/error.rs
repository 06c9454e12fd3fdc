//! Errors returned by the bencode decoder and encoder.

use thiserror::Error;

/// Error returned when a byte stream does not contain a well-formed bencoded
/// value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedBencode {
    #[error("unexpected end of input at byte {pos}")]
    TruncatedInput { pos: usize },

    #[error("expected one of 'i', 'l', 'd' or a digit at byte {pos}, found {found:#04x}")]
    InvalidByte { pos: usize, found: u8 },

    #[error("integer at byte {pos} has no 'e' delimiter")]
    IntegerNotTerminated { pos: usize },

    #[error("integer at byte {pos} has a leading zero")]
    IntegerLeadingZero { pos: usize },

    #[error("integer at byte {pos} is negative zero")]
    IntegerNegativeZero { pos: usize },

    #[error("integer at byte {pos} is not valid ASCII decimal")]
    IntegerNotDecimal { pos: usize },

    #[error("byte string length at byte {pos} is not a valid non-negative decimal")]
    InvalidLength { pos: usize },

    #[error("byte string at byte {pos} declares {declared} bytes but only {available} remain")]
    LengthOverflow {
        pos: usize,
        declared: usize,
        available: usize,
    },

    #[error("trailing bytes after a complete bencoded value, starting at byte {pos}")]
    TrailingBytes { pos: usize },
}

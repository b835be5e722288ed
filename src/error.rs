use serde::{de, ser};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while encoding or decoding XDR.
///
/// Every variant is fatal to the encode/decode call that produced it; a failed
/// decode yields no partial value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Attempted to read past the end of the input buffer
    #[error("unexpected end of data: needed {needed} bytes at position {position}")]
    UnexpectedEndOfData { position: usize, needed: usize },

    /// The boolean encoding was neither 0 nor 1
    #[error("invalid boolean encoding: {0} (must be 0 or 1)")]
    InvalidBooleanValue(u32),

    /// The discriminant of a union is outside its closed set of arms
    #[error("unknown discriminant {value} for {type_name}")]
    UnknownDiscriminant { type_name: &'static str, value: i32 },

    /// Fixed-length opaque data does not have the declared length
    #[error("fixed opaque length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A value is too long to carry a 32-bit length prefix
    #[error("value of {0} bytes is too long for a 32-bit length prefix")]
    ValueTooLong(usize),

    /// A length or count exceeded the declared maximum
    #[error("length {got} exceeds maximum {max}")]
    LengthExceedsMaximum { max: u32, got: u32 },

    /// A big integer does not fit the target width
    #[error("integer does not fit in {width} bytes")]
    IntegerOutOfRange { width: usize },

    /// An array count was negative
    #[error("negative length or count: {0}")]
    NegativeLength(i32),

    /// A string payload was not valid UTF-8
    #[error("string contains invalid UTF-8")]
    InvalidUtf8,

    /// Strict decode finished with unread input left over
    #[error("{0} trailing bytes after decoded value")]
    TrailingBytes(usize),

    /// Values were nested deeper than the configured limit
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// A custom error message from serde
    #[error("{0}")]
    Message(String),

    /// A sequence or map length was not known ahead of time (XDR requires it)
    #[error("sequence length must be known before serialization (XDR requires a length prefix)")]
    LengthRequired,

    /// XDR does not support this serde data model type
    #[error("XDR does not support type: {0}")]
    Unsupported(&'static str),

    /// An I/O error occurred during writing
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

//! OSC codec error types

use thiserror::Error;

/// OSC codec errors
#[derive(Error, Debug)]
pub enum Error {
    /// Input ended before a fixed-width or length-prefixed field was complete
    #[error("truncated input: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required by the field
        needed: usize,
        /// Bytes actually remaining
        got: usize,
    },

    /// String, symbol or address has no NUL terminator
    #[error("missing NUL terminator")]
    MissingTerminator,

    /// Type tag string is present but does not start with ','
    #[error("type tag string must start with ','")]
    MissingTypeTags,

    /// Bundle decode was requested but the `#bundle` marker is absent
    #[error("invalid bundle marker")]
    InvalidBundleTag,

    /// Type tag not known to this codec (strict mode only)
    #[error("unknown type tag: {tag:?}")]
    UnknownTypeTag {
        /// Offending tag character
        tag: char,
    },

    /// `[` without a matching `]`, or a stray `]`
    #[error("unbalanced array brackets in type tag string")]
    UnbalancedArray,

    /// Message bytes remain after the last argument
    #[error("{count} trailing bytes after message arguments")]
    TrailingBytes {
        /// Unconsumed byte count
        count: usize,
    },

    /// Nesting of bundles or arrays exceeds the configured limit
    #[error("nesting too deep (max {max})")]
    NestingTooDeep {
        /// Configured limit
        max: usize,
    },

    /// Text field is not valid UTF-8
    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Codepoint is not a Unicode scalar value
    #[error("invalid char codepoint: {codepoint:#x}")]
    InvalidChar {
        /// Raw codepoint
        codepoint: u32,
    },

    /// Caller-supplied codepoint is not a Unicode scalar value
    #[error("cannot build a char from codepoint {codepoint:#x}")]
    InvalidCodepoint {
        /// Rejected codepoint
        codepoint: u32,
    },

    /// Text field contains an interior NUL and cannot be encoded
    #[error("{field} contains an interior NUL byte")]
    InteriorNul {
        /// Which field was rejected
        field: &'static str,
    },

    /// Char constructor was given other than exactly one character
    #[error("expected exactly one character, got {len}")]
    NotSingleChar {
        /// Number of characters supplied
        len: usize,
    },

    /// Integer does not fit in a 64-bit two's-complement value
    #[error("integer {value} exceeds the 64-bit range")]
    IntegerOverflow {
        /// Rejected value
        value: i128,
    },

    /// Blob or element length does not fit the u32 length prefix
    #[error("payload too large for u32 length prefix: {size} bytes")]
    BlobTooLarge {
        /// Payload size
        size: usize,
    },

    /// MIDI value has neither 3 nor 4 bytes
    #[error("MIDI value must be 3 or 4 bytes, got {len}")]
    InvalidMidi {
        /// Supplied length
        len: usize,
    },

    /// Stream frame length exceeds the configured maximum
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge {
        /// Announced size
        size: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Stream closed in the middle of a frame
    #[error("stream closed (incomplete frame)")]
    ConnectionClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors raised while encoding a value.
    #[must_use]
    pub const fn is_encode_error(&self) -> bool {
        matches!(
            self,
            Self::InteriorNul { .. }
                | Self::IntegerOverflow { .. }
                | Self::BlobTooLarge { .. }
                | Self::InvalidMidi { .. }
                | Self::NotSingleChar { .. }
                | Self::InvalidCodepoint { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_classification() {
        assert!(Error::InteriorNul { field: "address" }.is_encode_error());
        assert!(Error::IntegerOverflow { value: i128::MAX }.is_encode_error());
        assert!(Error::InvalidCodepoint { codepoint: 0xD800 }.is_encode_error());
        assert!(!Error::InvalidChar { codepoint: 0xD800 }.is_encode_error());
        assert!(!Error::MissingTerminator.is_encode_error());
        assert!(!Error::Truncated { needed: 4, got: 1 }.is_encode_error());
    }

    #[test]
    fn test_display_carries_context() {
        let err = Error::UnknownTypeTag { tag: 'x' };
        assert!(err.to_string().contains('x'));
        let err = Error::FrameTooLarge { size: 10, max: 4 };
        assert!(err.to_string().contains("10"));
    }
}

//! OSC argument model and type tags

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch.
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// OSC type tag characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `i` 32-bit big-endian two's-complement integer
    Int32,
    /// `h` 64-bit big-endian two's-complement integer
    Int64,
    /// `f` IEEE-754 single
    Float32,
    /// `d` IEEE-754 double
    Float64,
    /// `s` NUL-terminated string
    String,
    /// `S` symbol, encoded like a string
    Symbol,
    /// `b` length-prefixed blob
    Blob,
    /// `t` 64-bit NTP time tag
    TimeTag,
    /// `m` 4-byte MIDI message
    Midi,
    /// `c` 32-bit codepoint
    Char,
    /// `r` 32-bit RGBA color
    Rgba,
    /// `T`
    True,
    /// `F`
    False,
    /// `N`
    Nil,
    /// `I`
    Impulse,
    /// `[`
    ArrayOpen,
    /// `]`
    ArrayClose,
    /// Any other byte
    Unknown(u8),
}

impl TypeTag {
    /// Convert from a tag string byte.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            b'i' => Self::Int32,
            b'h' => Self::Int64,
            b'f' => Self::Float32,
            b'd' => Self::Float64,
            b's' => Self::String,
            b'S' => Self::Symbol,
            b'b' => Self::Blob,
            b't' => Self::TimeTag,
            b'm' => Self::Midi,
            b'c' => Self::Char,
            b'r' => Self::Rgba,
            b'T' => Self::True,
            b'F' => Self::False,
            b'N' => Self::Nil,
            b'I' => Self::Impulse,
            b'[' => Self::ArrayOpen,
            b']' => Self::ArrayClose,
            other => Self::Unknown(other),
        }
    }

    /// Convert to the tag string byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Int32 => b'i',
            Self::Int64 => b'h',
            Self::Float32 => b'f',
            Self::Float64 => b'd',
            Self::String => b's',
            Self::Symbol => b'S',
            Self::Blob => b'b',
            Self::TimeTag => b't',
            Self::Midi => b'm',
            Self::Char => b'c',
            Self::Rgba => b'r',
            Self::True => b'T',
            Self::False => b'F',
            Self::Nil => b'N',
            Self::Impulse => b'I',
            Self::ArrayOpen => b'[',
            Self::ArrayClose => b']',
            Self::Unknown(other) => other,
        }
    }

}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_u8()))
    }
}

/// 64-bit NTP time tag: seconds since 1900 plus a 32-bit binary fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeTag {
    /// Seconds since 1900-01-01
    pub seconds: u32,
    /// Fractional second in units of 2^-32
    pub fraction: u32,
}

impl TimeTag {
    /// Reserved "process immediately" value (bit pattern `0x0000000000000001`).
    pub const IMMEDIATE: Self = Self {
        seconds: 0,
        fraction: 1,
    };

    /// Create a time tag from its two halves.
    #[must_use]
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Self { seconds, fraction }
    }

    /// Build from the raw 64-bit representation.
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self {
            seconds: (value >> 32) as u32,
            fraction: value as u32,
        }
    }

    /// Raw 64-bit representation.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        ((self.seconds as u64) << 32) | self.fraction as u64
    }

    /// Check for the immediate sentinel.
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        self.as_u64() == 1
    }

    /// Convert a wall-clock time. Times before 1970 clamp to the Unix epoch;
    /// seconds wrap at the end of NTP era 0.
    #[must_use]
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_unix = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        let seconds = (since_unix.as_secs() + NTP_UNIX_OFFSET) as u32;
        let fraction = ((u64::from(since_unix.subsec_nanos()) << 32) / NANOS_PER_SECOND) as u32;
        Self { seconds, fraction }
    }

    /// Convert to wall-clock time, interpreting seconds in NTP era 0.
    #[must_use]
    pub fn to_system_time(self) -> SystemTime {
        let nanos = ((u64::from(self.fraction) * NANOS_PER_SECOND) >> 32) as u32;
        let seconds = u64::from(self.seconds);
        if seconds >= NTP_UNIX_OFFSET {
            UNIX_EPOCH + Duration::new(seconds - NTP_UNIX_OFFSET, nanos)
        } else {
            let before_unix = Duration::from_secs(NTP_UNIX_OFFSET - seconds);
            UNIX_EPOCH - before_unix + Duration::from_nanos(u64::from(nanos))
        }
    }
}

impl Default for TimeTag {
    fn default() -> Self {
        Self::IMMEDIATE
    }
}

impl From<SystemTime> for TimeTag {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

/// 4-byte MIDI message: port id, status byte, two data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Midi {
    /// Port id
    pub port: u8,
    /// Status byte
    pub status: u8,
    /// First data byte
    pub data1: u8,
    /// Second data byte
    pub data2: u8,
}

impl Midi {
    /// Create a MIDI value.
    #[must_use]
    pub const fn new(port: u8, status: u8, data1: u8, data2: u8) -> Self {
        Self {
            port,
            status,
            data1,
            data2,
        }
    }

    /// Accept a 3-byte message (port 0 is prepended) or a full 4-byte value.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match *bytes {
            [status, data1, data2] => Ok(Self::new(0, status, data1, data2)),
            [port, status, data1, data2] => Ok(Self::new(port, status, data1, data2)),
            _ => Err(Error::InvalidMidi { len: bytes.len() }),
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.port, self.status, self.data1, self.data2]
    }
}

/// 32-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Create a color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Wire representation.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Symbol: string-like value kept distinct from OSC strings.
///
/// Cloning shares the underlying text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a symbol.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// Symbol text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0.to_string()
    }
}

/// A single OSC argument.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Argument {
    /// `i`
    Int32(i32),
    /// `h`
    Int64(i64),
    /// `f`
    Float32(f32),
    /// `d`
    Float64(f64),
    /// `s`
    String(String),
    /// `b`
    Blob(Bytes),
    /// `S`
    Symbol(Symbol),
    /// `t`
    TimeTag(TimeTag),
    /// `m`
    Midi(Midi),
    /// `c`
    Char(char),
    /// `r`
    Rgba(Rgba),
    /// `T` / `F`
    Bool(bool),
    /// `N`
    Nil,
    /// `I`
    Impulse,
    /// `[` ... `]`
    Array(Vec<Argument>),
}

impl Argument {
    /// Pick the narrowest integer width: `Int32` when `|v| < 2^31 - 1`,
    /// `Int64` when `|v| < 2^63`.
    pub fn integer(value: impl Into<i128>) -> Result<Self> {
        let value = value.into();
        let magnitude = value.unsigned_abs();
        if magnitude < (1u128 << 31) - 1 {
            Ok(Self::Int32(value as i32))
        } else if magnitude < 1u128 << 63 {
            Ok(Self::Int64(value as i64))
        } else {
            Err(Error::IntegerOverflow { value })
        }
    }

    /// `Float32` when the value is finite and representable in single
    /// precision range, otherwise `Float64`.
    #[must_use]
    pub fn float(value: f64) -> Self {
        if value.is_finite() && value.abs() <= f64::from(f32::MAX) {
            Self::Float32(value as f32)
        } else {
            Self::Float64(value)
        }
    }

    /// `String` when the bytes are printable UTF-8, otherwise `Blob`.
    #[must_use]
    pub fn text(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        match String::from_utf8(bytes) {
            Ok(text) if is_printable(&text) => Self::String(text),
            Ok(text) => Self::Blob(Bytes::from(text.into_bytes())),
            Err(err) => Self::Blob(Bytes::from(err.into_bytes())),
        }
    }

    /// `Char` from a string holding exactly one character.
    pub fn char_from_str(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self::Char(c)),
            _ => Err(Error::NotSingleChar {
                len: text.chars().count(),
            }),
        }
    }

    /// `Char` from a raw codepoint.
    pub fn char_from_u32(codepoint: u32) -> Result<Self> {
        char::from_u32(codepoint)
            .map(Self::Char)
            .ok_or(Error::InvalidCodepoint { codepoint })
    }

    /// Type tag for this argument; `ArrayOpen` for arrays.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        match self {
            Self::Int32(_) => TypeTag::Int32,
            Self::Int64(_) => TypeTag::Int64,
            Self::Float32(_) => TypeTag::Float32,
            Self::Float64(_) => TypeTag::Float64,
            Self::String(_) => TypeTag::String,
            Self::Blob(_) => TypeTag::Blob,
            Self::Symbol(_) => TypeTag::Symbol,
            Self::TimeTag(_) => TypeTag::TimeTag,
            Self::Midi(_) => TypeTag::Midi,
            Self::Char(_) => TypeTag::Char,
            Self::Rgba(_) => TypeTag::Rgba,
            Self::Bool(true) => TypeTag::True,
            Self::Bool(false) => TypeTag::False,
            Self::Nil => TypeTag::Nil,
            Self::Impulse => TypeTag::Impulse,
            Self::Array(_) => TypeTag::ArrayOpen,
        }
    }
}

fn is_printable(text: &str) -> bool {
    !text.chars().any(|c| c.is_control() && !c.is_whitespace())
}

impl From<i32> for Argument {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f32> for Argument {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<char> for Argument {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<Vec<u8>> for Argument {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(Bytes::from(value))
    }
}

impl From<Bytes> for Argument {
    fn from(value: Bytes) -> Self {
        Self::Blob(value)
    }
}

impl From<Symbol> for Argument {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<TimeTag> for Argument {
    fn from(value: TimeTag) -> Self {
        Self::TimeTag(value)
    }
}

impl From<Midi> for Argument {
    fn from(value: Midi) -> Self {
        Self::Midi(value)
    }
}

impl From<Rgba> for Argument {
    fn from(value: Rgba) -> Self {
        Self::Rgba(value)
    }
}

impl From<Vec<Argument>> for Argument {
    fn from(value: Vec<Argument>) -> Self {
        Self::Array(value)
    }
}

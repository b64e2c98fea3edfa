//! OSC protocol core implementation
//!
//! This module provides the wire format, argument model and codec for OSC
//! messages and bundles.

mod bundle;
mod codec;
mod config;
mod error;
mod message;
pub mod metrics;
pub mod padding;
mod primitive;
mod tags;
mod types;

pub use bundle::Bundle;
pub use codec::{Packet, decode, decode_with, encode, encode_into};
pub use config::{
    DecodeConfig, SymbolTarget, UnknownTagPolicy, default_symbol_target,
    set_default_symbol_target,
};
pub use error::{Error, Result};
pub use message::Message;
pub use metrics::MetricsSnapshot;
pub use tags::type_tag_string;
pub use types::{Argument, Midi, NTP_UNIX_OFFSET, Rgba, Symbol, TimeTag, TypeTag};

/// Bundle marker: "#bundle" followed by a NUL byte
pub const BUNDLE_TAG: &[u8] = b"#bundle\0";

/// Time tag size in bytes
pub const TIME_TAG_SIZE: usize = 8;

/// Bundle header size in bytes (marker + time tag)
pub const BUNDLE_HEADER_SIZE: usize = 16;

/// Default limit for bundle and array nesting
pub const DEFAULT_MAX_DEPTH: usize = 32;

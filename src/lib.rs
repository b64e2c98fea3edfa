//! oscwire - Open Sound Control (OSC) message and bundle codec
//!
//! This library converts OSC messages and bundles to and from their
//! 4-byte-aligned, big-endian binary wire format. It has no transport,
//! scheduling or dispatch logic.
//!
//! # Quick Start
//!
//! ```rust
//! use oscwire::{Bundle, Message, Packet, TimeTag};
//!
//! // Build a message
//! let msg = Message::new("/synth/freq").arg(440.0_f32).arg("sine");
//!
//! // Wrap it in a bundle and encode
//! let packet = Packet::from(Bundle::new(TimeTag::IMMEDIATE).element(msg));
//! let bytes = packet.encode()?;
//! assert_eq!(bytes.len() % 4, 0);
//!
//! // Decode
//! let decoded = oscwire::decode(bytes)?;
//! assert_eq!(decoded, packet);
//! # Ok::<(), oscwire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Full OSC 1.0 type set** plus the common extensions (`h d S t m c r T F N I [ ]`)
//! - **Zero-copy decoding** - blobs and bundle elements borrow from the input [`bytes::Bytes`]
//! - **Explicit decode configuration** - symbol target, unknown tag policy and
//!   nesting limit travel with each call via [`DecodeConfig`]
//! - **Stream framing** - length-prefixed packets for TCP-like transports in [`framing`]
//! - **`serde` feature** - `Serialize`/`Deserialize` for all value types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod framing;
pub mod protocol;

pub use protocol::{
    Argument, BUNDLE_TAG, Bundle, DecodeConfig, Error, Message, Midi, Packet, Result, Rgba,
    Symbol, SymbolTarget, TimeTag, TypeTag, UnknownTagPolicy, decode, decode_with, encode,
    encode_into,
};

/// OSC specification version implemented
pub const OSC_VERSION: &str = "1.0";

//! OSC message: address plus ordered arguments.

use bytes::{Buf, Bytes, BytesMut};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::config::{DecodeConfig, UnknownTagPolicy};
use super::primitive::{decode_arguments, decode_string, encode_argument, encode_str};
use super::tags::{decode_type_tags, encode_type_tags, type_tag_string};
use super::{Argument, Error, Result};

/// OSC message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Address pattern
    pub address: String,
    /// Arguments, in type tag order
    pub args: Vec<Argument>,
}

impl Message {
    /// Create a message with no arguments.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            args: Vec::new(),
        }
    }

    /// Create a message with arguments.
    pub fn with_args(address: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Append an argument.
    pub fn push(&mut self, arg: impl Into<Argument>) {
        self.args.push(arg.into());
    }

    /// Builder form of [`Message::push`].
    #[must_use]
    pub fn arg(mut self, arg: impl Into<Argument>) -> Self {
        self.push(arg);
        self
    }

    /// Comma-prefixed type tag string for the current arguments.
    #[must_use]
    pub fn type_tags(&self) -> String {
        type_tag_string(&self.args)
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new("/")
    }
}

/// Append the wire form of `message`.
///
/// ```text
/// [ADDRESS + NUL + PAD] [',' TAGS + NUL + PAD] [ARGUMENT PAYLOADS]
/// ```
pub(crate) fn encode_message(message: &Message, dst: &mut BytesMut) -> Result<()> {
    encode_str(&message.address, "address", dst)?;
    encode_type_tags(&message.args, dst);
    for arg in &message.args {
        encode_argument(arg, dst)?;
    }
    Ok(())
}

/// Decode a message occupying all of `src`.
///
/// A message that ends right after its address has no arguments.
pub(crate) fn decode_message(mut src: Bytes, config: &DecodeConfig) -> Result<Message> {
    let address = decode_string(&mut src)?;
    if !src.has_remaining() {
        return Ok(Message::new(address));
    }

    let tags = decode_type_tags(&mut src)?;
    let args = decode_arguments(&tags, &mut src, config)?;

    if src.has_remaining() {
        match config.unknown_tags {
            UnknownTagPolicy::Reject => {
                return Err(Error::TrailingBytes {
                    count: src.remaining(),
                });
            }
            UnknownTagPolicy::Skip => {
                debug!(
                    count = src.remaining(),
                    address = %address.as_str(),
                    "ignoring trailing message bytes"
                );
            }
        }
    }

    Ok(Message { address, args })
}

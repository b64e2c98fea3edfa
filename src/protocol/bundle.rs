//! OSC bundle: time tag plus length-prefixed elements.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::codec::{Packet, decode_packet, encode_packet};
use super::config::DecodeConfig;
use super::padding::require;
use super::primitive::{decode_time_tag, encode_time_tag};
use super::{BUNDLE_TAG, Error, Message, Result, TimeTag};

/// OSC bundle
///
/// Nested bundles are expected to carry a time tag no earlier than their
/// parent's. The codec does not check this.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bundle {
    /// Execution time
    pub time: TimeTag,
    /// Messages and nested bundles, in wire order
    pub elements: Vec<Packet>,
}

impl Bundle {
    /// Create an empty bundle.
    #[must_use]
    pub const fn new(time: TimeTag) -> Self {
        Self {
            time,
            elements: Vec::new(),
        }
    }

    /// Create an empty bundle tagged for immediate execution.
    #[must_use]
    pub const fn immediate() -> Self {
        Self::new(TimeTag::IMMEDIATE)
    }

    /// Create a bundle from its elements.
    #[must_use]
    pub const fn with_elements(time: TimeTag, elements: Vec<Packet>) -> Self {
        Self { time, elements }
    }

    /// Append a message or nested bundle.
    pub fn push(&mut self, element: impl Into<Packet>) {
        self.elements.push(element.into());
    }

    /// Builder form of [`Bundle::push`].
    #[must_use]
    pub fn element(mut self, element: impl Into<Packet>) -> Self {
        self.push(element);
        self
    }

    /// Iterate over all messages, depth first, in wire order.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        let mut stack: Vec<std::slice::Iter<'_, Packet>> = vec![self.elements.iter()];
        std::iter::from_fn(move || {
            while let Some(top) = stack.last_mut() {
                match top.next() {
                    Some(Packet::Message(message)) => return Some(message),
                    Some(Packet::Bundle(bundle)) => stack.push(bundle.elements.iter()),
                    None => {
                        stack.pop();
                    }
                }
            }
            None
        })
    }
}

/// Append the wire form of `bundle`.
///
/// ```text
/// ["#bundle\0"] [SECONDS u32] [FRACTION u32] { [LEN u32] [ELEMENT] }*
/// ```
pub(crate) fn encode_bundle(bundle: &Bundle, dst: &mut BytesMut) -> Result<()> {
    dst.put_slice(BUNDLE_TAG);
    encode_time_tag(bundle.time, dst);

    for element in &bundle.elements {
        // Length prefix is back-filled once the element is written.
        let prefix_at = dst.len();
        dst.put_u32(0);
        encode_packet(element, dst)?;

        let size = dst.len() - prefix_at - 4;
        let len = u32::try_from(size).map_err(|_| Error::BlobTooLarge { size })?;
        dst[prefix_at..prefix_at + 4].copy_from_slice(&len.to_be_bytes());
    }
    Ok(())
}

/// Decode a bundle occupying all of `src`. `depth` is the nesting level of
/// this bundle; elements are decoded at `depth + 1`.
pub(crate) fn decode_bundle(
    mut src: Bytes,
    config: &DecodeConfig,
    depth: usize,
) -> Result<Bundle> {
    if depth > config.max_depth {
        debug!(depth, max = config.max_depth, "bundle nesting limit reached");
        return Err(Error::NestingTooDeep {
            max: config.max_depth,
        });
    }

    require(&src, BUNDLE_TAG.len())?;
    if !src.starts_with(BUNDLE_TAG) {
        return Err(Error::InvalidBundleTag);
    }
    src.advance(BUNDLE_TAG.len());
    let time = decode_time_tag(&mut src)?;

    let mut elements = Vec::new();
    while src.has_remaining() {
        require(&src, 4)?;
        let len = src.get_u32() as usize;
        require(&src, len)?;
        let chunk = src.split_to(len);
        trace!(depth, index = elements.len(), len, "decoding bundle element");
        elements.push(decode_packet(chunk, config, depth + 1)?);
    }

    Ok(Bundle { time, elements })
}

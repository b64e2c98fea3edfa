//! OSC packet codec (encode/decode)
//!
//! A packet is either a message or a bundle. Decoding tells them apart by
//! the leading `#bundle\0` marker; there is no explicit type byte.

use bytes::{Bytes, BytesMut};
use tracing::{instrument, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bundle::{decode_bundle, encode_bundle};
use super::config::DecodeConfig;
use super::message::{decode_message, encode_message};
use super::metrics::{Metrics, PacketKind};
use super::{BUNDLE_TAG, Bundle, Message, Result};

/// Top-level OSC content: a message or a bundle
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Packet {
    /// Single message
    Message(Message),
    /// Time-tagged group of packets
    Bundle(Bundle),
}

impl Packet {
    /// Encode packet to bytes
    pub fn encode(&self) -> Result<Bytes> {
        encode(self)
    }

    /// Decode packet from a byte slice using the process-wide defaults
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode(Bytes::copy_from_slice(bytes))
    }

    const fn kind(&self) -> PacketKind {
        match self {
            Self::Message(_) => PacketKind::Message,
            Self::Bundle(_) => PacketKind::Bundle,
        }
    }
}

impl From<Message> for Packet {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Bundle> for Packet {
    fn from(bundle: Bundle) -> Self {
        Self::Bundle(bundle)
    }
}

/// Encode a packet to bytes
///
/// # Format
///
/// ```text
/// Message: [ADDRESS] [,TAGS] [ARGUMENTS]
/// Bundle:  [#bundle\0] [TIME TAG] { [LEN] [PACKET] }*
/// ```
///
/// Every field is big-endian and the output length is a multiple of 4.
pub fn encode(packet: &Packet) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_into(packet, &mut dst)?;
    Ok(dst.freeze())
}

/// Append the encoded packet to `dst`.
///
/// On error `dst` is left at its original length.
pub fn encode_into(packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    let start = dst.len();
    match encode_packet(packet, dst) {
        Ok(()) => {
            Metrics::record_encoded(packet.kind(), dst.len() - start);
            Ok(())
        }
        Err(err) => {
            dst.truncate(start);
            Metrics::record_encode_error();
            Err(err)
        }
    }
}

pub(crate) fn encode_packet(packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    match packet {
        Packet::Message(message) => encode_message(message, dst),
        Packet::Bundle(bundle) => encode_bundle(bundle, dst),
    }
}

/// Decode a packet using [`DecodeConfig::from_global`].
///
/// # Errors
///
/// Returns an error if:
/// - A string, address or tag string lacks its NUL terminator
/// - A fixed-width or length-prefixed field is truncated
/// - The type tag string is malformed or names an unknown type
/// - Nesting exceeds the configured depth
pub fn decode(bytes: Bytes) -> Result<Packet> {
    decode_with(bytes, &DecodeConfig::from_global())
}

/// Decode a packet with an explicit configuration. Never reads global state.
#[instrument(level = "trace", skip_all, fields(len = bytes.len()))]
pub fn decode_with(bytes: Bytes, config: &DecodeConfig) -> Result<Packet> {
    let len = bytes.len();
    match decode_packet(bytes, config, 0) {
        Ok(packet) => {
            Metrics::record_decoded(packet.kind(), len);
            Ok(packet)
        }
        Err(err) => {
            Metrics::record_decode_error();
            Err(err)
        }
    }
}

pub(crate) fn decode_packet(bytes: Bytes, config: &DecodeConfig, depth: usize) -> Result<Packet> {
    if bytes.starts_with(BUNDLE_TAG) {
        trace!(depth, len = bytes.len(), "decoding bundle");
        decode_bundle(bytes, config, depth).map(Packet::Bundle)
    } else {
        trace!(depth, len = bytes.len(), "decoding message");
        decode_message(bytes, config).map(Packet::Message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        Argument, Error, Midi, Rgba, Symbol, SymbolTarget, TimeTag, UnknownTagPolicy,
    };

    fn sample_message() -> Message {
        Message::new("/synth/1/freq")
            .arg(440.0_f32)
            .arg(7_i32)
            .arg(-9_000_000_000_i64)
            .arg(2.5_f64)
            .arg("sine")
            .arg(Symbol::new("on"))
            .arg(vec![1u8, 2, 3])
            .arg(TimeTag::new(3, 4))
            .arg(Midi::new(0, 0x90, 60, 100))
            .arg('é')
            .arg(Rgba::new(255, 0, 0, 128))
            .arg(true)
            .arg(false)
            .arg(Argument::Nil)
            .arg(Argument::Impulse)
            .arg(vec![Argument::Int32(1), Argument::Array(vec![Argument::from("x")])])
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let original = Packet::from(sample_message());
        let encoded = encode(&original).unwrap();
        assert_eq!(encoded.len() % 4, 0);
        let decoded = decode_with(encoded, &DecodeConfig::default()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_nested_bundle_roundtrip() {
        let inner = Bundle::new(TimeTag::new(10, 0)).element(Message::new("/inner").arg(1_i32));
        let middle = Bundle::new(TimeTag::new(5, 0))
            .element(inner)
            .element(sample_message());
        let outer = Packet::from(
            Bundle::new(TimeTag::new(1, 0))
                .element(Message::default())
                .element(middle),
        );

        let encoded = encode(&outer).unwrap();
        assert_eq!(encoded.len() % 4, 0);
        assert_eq!(decode_with(encoded, &DecodeConfig::default()).unwrap(), outer);
    }

    #[test]
    fn test_dispatch_by_marker() {
        let bundle = encode(&Packet::from(Bundle::immediate())).unwrap();
        assert!(matches!(
            decode_with(bundle, &DecodeConfig::default()),
            Ok(Packet::Bundle(_))
        ));

        let message = encode(&Packet::from(Message::new("/#bundle"))).unwrap();
        assert!(matches!(
            decode_with(message, &DecodeConfig::default()),
            Ok(Packet::Message(_))
        ));
    }

    #[test]
    fn test_immediate_time_tag() {
        let encoded = encode(&Packet::from(Bundle::immediate())).unwrap();
        let Packet::Bundle(bundle) = decode_with(encoded, &DecodeConfig::default()).unwrap() else {
            panic!("expected bundle");
        };
        assert_eq!(bundle.time.as_u64(), 1);
    }

    #[test]
    fn test_encode_error_leaves_buffer_untouched() {
        let mut dst = BytesMut::from(&b"keep"[..]);
        let bad = Packet::from(Bundle::immediate().element(Message::new("/ok")).element(
            Message::new("/bad").arg("nul\0inside"),
        ));
        let result = encode_into(&bad, &mut dst);
        assert!(matches!(result, Err(Error::InteriorNul { field: "string" })));
        assert!(result.unwrap_err().is_encode_error());
        assert_eq!(&dst[..], b"keep");
    }

    #[test]
    fn test_symbol_target_is_per_call() {
        let encoded = encode(&Packet::from(Message::new("/s").arg(Symbol::new("atom")))).unwrap();
        let as_string = DecodeConfig::default().with_symbol_target(SymbolTarget::String);
        let Packet::Message(message) = decode_with(encoded.clone(), &as_string).unwrap() else {
            panic!("expected message");
        };
        assert_eq!(message.args, vec![Argument::from("atom")]);

        let Packet::Message(message) = decode_with(encoded, &DecodeConfig::default()).unwrap()
        else {
            panic!("expected message");
        };
        assert_eq!(message.args, vec![Argument::Symbol(Symbol::new("atom"))]);
    }

    #[test]
    fn test_lenient_decode_drops_unknown_tags() {
        let mut raw = encode(&Packet::from(Message::new("/u").arg(1_i32).arg(true)))
            .unwrap()
            .to_vec();
        // "/u\0\0" ",iT\0": replace the 'T' tag
        raw[6] = b'x';
        let lenient = DecodeConfig::default().with_unknown_tags(UnknownTagPolicy::Skip);
        let Packet::Message(message) = decode_with(Bytes::from(raw.clone()), &lenient).unwrap()
        else {
            panic!("expected message");
        };
        assert_eq!(message.args, vec![Argument::Int32(1)]);

        let strict = decode_with(Bytes::from(raw), &DecodeConfig::default());
        assert!(matches!(strict, Err(Error::UnknownTypeTag { tag: 'x' })));
    }

    #[test]
    fn test_decode_empty_input() {
        let result = decode_with(Bytes::new(), &DecodeConfig::default());
        assert!(matches!(result, Err(Error::MissingTerminator)));
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn text_strategy() -> impl Strategy<Value = String> {
            "[a-zA-Z0-9/_ .-]{0,24}"
        }

        fn scalar_strategy() -> impl Strategy<Value = Argument> {
            prop_oneof![
                any::<i32>().prop_map(Argument::Int32),
                any::<i64>().prop_map(Argument::Int64),
                (-1.0e30f32..1.0e30).prop_map(Argument::Float32),
                (-1.0e300f64..1.0e300).prop_map(Argument::Float64),
                text_strategy().prop_map(Argument::String),
                text_strategy().prop_map(|s| Argument::Symbol(Symbol::from(s))),
                prop::collection::vec(any::<u8>(), 0..64).prop_map(Argument::from),
                any::<u64>().prop_map(|v| Argument::TimeTag(TimeTag::from_u64(v))),
                any::<[u8; 4]>().prop_map(|[p, s, a, b]| Argument::Midi(Midi::new(p, s, a, b))),
                any::<char>().prop_map(Argument::Char),
                any::<[u8; 4]>().prop_map(|[r, g, b, a]| Argument::Rgba(Rgba::new(r, g, b, a))),
                any::<bool>().prop_map(Argument::Bool),
                Just(Argument::Nil),
                Just(Argument::Impulse),
            ]
        }

        fn argument_strategy() -> impl Strategy<Value = Argument> {
            scalar_strategy().prop_recursive(3, 16, 4, |inner| {
                prop::collection::vec(inner, 0..4).prop_map(Argument::Array)
            })
        }

        fn message_strategy() -> impl Strategy<Value = Message> {
            (
                text_strategy(),
                prop::collection::vec(argument_strategy(), 0..8),
            )
                .prop_map(|(address, args)| Message::with_args(format!("/{address}"), args))
        }

        fn packet_strategy() -> impl Strategy<Value = Packet> {
            message_strategy()
                .prop_map(Packet::Message)
                .prop_recursive(3, 24, 4, |inner| {
                    (any::<u64>(), prop::collection::vec(inner, 0..4)).prop_map(
                        |(time, elements)| {
                            Packet::Bundle(Bundle::with_elements(TimeTag::from_u64(time), elements))
                        },
                    )
                })
        }

        proptest! {
            /// Property: Any packet should roundtrip correctly
            #[test]
            fn prop_roundtrip_preserves_packet(packet in packet_strategy()) {
                let encoded = encode(&packet).unwrap();
                let decoded = decode_with(encoded, &DecodeConfig::default()).unwrap();
                prop_assert_eq!(decoded, packet);
            }

            /// Property: Encoded output is always 4-byte aligned
            #[test]
            fn prop_output_aligned(packet in packet_strategy()) {
                let encoded = encode(&packet).unwrap();
                prop_assert_eq!(encoded.len() % 4, 0);
            }

            /// Property: Strings get at least one NUL byte even when aligned
            #[test]
            fn prop_string_always_terminated(text in text_strategy()) {
                let message = Message::new("/s").arg(text.clone());
                let encoded = encode(&Packet::from(message)).unwrap();
                // "/s\0\0" ",s\0\0" then the string
                let payload = &encoded[8..];
                prop_assert!(payload.len() > text.len());
                prop_assert_eq!(payload[text.len()], 0);
            }

            /// Property: A truncated message never decodes back to the original
            #[test]
            fn prop_truncation_detected(message in message_strategy(), cut in 1usize..16) {
                let encoded = encode(&Packet::from(message.clone())).unwrap();
                let keep = encoded.len().saturating_sub(cut);
                let result = decode_with(encoded.slice(..keep), &DecodeConfig::default());
                if let Ok(Packet::Message(decoded)) = result {
                    prop_assert!(decoded != message || message.args.is_empty());
                }
            }
        }
    }
}

//! Encoding and decoding of individual OSC arguments.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use super::config::{DecodeConfig, SymbolTarget, UnknownTagPolicy};
use super::metrics::Metrics;
use super::padding::{put_padded, require, skip_padding};
use super::{
    Argument, Error, Midi, Result, Rgba, Symbol, TIME_TAG_SIZE, TimeTag, TypeTag,
};

/// Append the payload of `arg`. Payload-free arguments write nothing;
/// arrays write their elements back to back.
pub(crate) fn encode_argument(arg: &Argument, dst: &mut BytesMut) -> Result<()> {
    match arg {
        Argument::Bool(_) | Argument::Nil | Argument::Impulse => {}
        Argument::Int32(value) => dst.put_i32(*value),
        Argument::Int64(value) => dst.put_i64(*value),
        Argument::Float32(value) => dst.put_f32(*value),
        Argument::Float64(value) => dst.put_f64(*value),
        Argument::String(value) => encode_str(value, "string", dst)?,
        Argument::Symbol(value) => encode_str(value.as_str(), "symbol", dst)?,
        Argument::Blob(value) => encode_blob(value, dst)?,
        Argument::TimeTag(value) => encode_time_tag(*value, dst),
        Argument::Midi(value) => dst.put_slice(&value.to_bytes()),
        Argument::Char(value) => dst.put_u32(u32::from(*value)),
        Argument::Rgba(value) => dst.put_slice(&value.to_bytes()),
        Argument::Array(items) => {
            for item in items {
                encode_argument(item, dst)?;
            }
        }
    }
    Ok(())
}

/// Write an OSC string: bytes, NUL terminator, padding.
pub(crate) fn encode_str(value: &str, field: &'static str, dst: &mut BytesMut) -> Result<()> {
    if value.as_bytes().contains(&0) {
        return Err(Error::InteriorNul { field });
    }
    put_padded(dst, value.as_bytes());
    Ok(())
}

fn encode_blob(value: &[u8], dst: &mut BytesMut) -> Result<()> {
    let size = value.len();
    let len = u32::try_from(size).map_err(|_| Error::BlobTooLarge { size })?;
    dst.put_u32(len);
    put_padded(dst, value);
    Ok(())
}

pub(crate) fn encode_time_tag(value: TimeTag, dst: &mut BytesMut) {
    dst.put_u32(value.seconds);
    dst.put_u32(value.fraction);
}

/// Decode the arguments described by `tags` from `src`, in tag order.
pub(crate) fn decode_arguments(
    tags: &[TypeTag],
    src: &mut Bytes,
    config: &DecodeConfig,
) -> Result<Vec<Argument>> {
    let mut tags = tags.iter().copied();
    decode_sequence(&mut tags, src, config, 0)
}

/// Decode until the tags run out (`depth == 0`) or the `]` closing the
/// current array is reached (`depth > 0`).
fn decode_sequence(
    tags: &mut impl Iterator<Item = TypeTag>,
    src: &mut Bytes,
    config: &DecodeConfig,
    depth: usize,
) -> Result<Vec<Argument>> {
    let mut args = Vec::new();
    while let Some(tag) = tags.next() {
        match tag {
            TypeTag::ArrayOpen => {
                if depth >= config.max_depth {
                    debug!(depth, max = config.max_depth, "array nesting limit reached");
                    return Err(Error::NestingTooDeep {
                        max: config.max_depth,
                    });
                }
                let items = decode_sequence(tags, src, config, depth + 1)?;
                args.push(Argument::Array(items));
            }
            TypeTag::ArrayClose => {
                return if depth > 0 {
                    Ok(args)
                } else {
                    Err(Error::UnbalancedArray)
                };
            }
            TypeTag::Unknown(byte) => match config.unknown_tags {
                UnknownTagPolicy::Reject => {
                    return Err(Error::UnknownTypeTag {
                        tag: char::from(byte),
                    });
                }
                UnknownTagPolicy::Skip => {
                    debug!(tag = %char::from(byte), "skipping unknown type tag");
                    Metrics::record_skipped_tag();
                }
            },
            tag => args.push(decode_argument(tag, src, config)?),
        }
    }

    if depth > 0 {
        return Err(Error::UnbalancedArray);
    }
    Ok(args)
}

/// Decode a single non-array argument selected by `tag`.
pub(crate) fn decode_argument(
    tag: TypeTag,
    src: &mut Bytes,
    config: &DecodeConfig,
) -> Result<Argument> {
    let arg = match tag {
        TypeTag::True => Argument::Bool(true),
        TypeTag::False => Argument::Bool(false),
        TypeTag::Nil => Argument::Nil,
        TypeTag::Impulse => Argument::Impulse,
        TypeTag::Int32 => {
            require(src, 4)?;
            Argument::Int32(src.get_i32())
        }
        TypeTag::Int64 => {
            require(src, 8)?;
            Argument::Int64(src.get_i64())
        }
        TypeTag::Float32 => {
            require(src, 4)?;
            Argument::Float32(src.get_f32())
        }
        TypeTag::Float64 => {
            require(src, 8)?;
            Argument::Float64(src.get_f64())
        }
        TypeTag::String => Argument::String(decode_string(src)?),
        TypeTag::Symbol => {
            let text = decode_string(src)?;
            match config.symbol_target {
                SymbolTarget::Symbol => Argument::Symbol(Symbol::from(text)),
                SymbolTarget::String => Argument::String(text),
            }
        }
        TypeTag::Blob => Argument::Blob(decode_blob(src)?),
        TypeTag::TimeTag => Argument::TimeTag(decode_time_tag(src)?),
        TypeTag::Midi => {
            let [port, status, data1, data2] = take4(src)?;
            Argument::Midi(Midi::new(port, status, data1, data2))
        }
        TypeTag::Char => {
            require(src, 4)?;
            let codepoint = src.get_u32();
            char::from_u32(codepoint)
                .map(Argument::Char)
                .ok_or(Error::InvalidChar { codepoint })?
        }
        TypeTag::Rgba => {
            let [r, g, b, a] = take4(src)?;
            Argument::Rgba(Rgba::new(r, g, b, a))
        }
        TypeTag::ArrayOpen | TypeTag::ArrayClose => return Err(Error::UnbalancedArray),
        TypeTag::Unknown(byte) => {
            return Err(Error::UnknownTypeTag {
                tag: char::from(byte),
            });
        }
    };
    Ok(arg)
}

/// Read a NUL-terminated, padded OSC string.
pub(crate) fn decode_string(src: &mut Bytes) -> Result<String> {
    let raw = take_terminated(src)?;
    Ok(std::str::from_utf8(&raw)?.to_owned())
}

/// Split off the bytes before the first NUL and consume their padding.
pub(crate) fn take_terminated(src: &mut Bytes) -> Result<Bytes> {
    let len = src
        .iter()
        .position(|&byte| byte == 0)
        .ok_or(Error::MissingTerminator)?;
    let raw = src.split_to(len);
    skip_padding(src, len)?;
    Ok(raw)
}

fn decode_blob(src: &mut Bytes) -> Result<Bytes> {
    require(src, 4)?;
    let len = src.get_u32() as usize;
    require(src, len)?;
    let blob = src.split_to(len);
    skip_padding(src, len)?;
    Ok(blob)
}

pub(crate) fn decode_time_tag(src: &mut Bytes) -> Result<TimeTag> {
    require(src, TIME_TAG_SIZE)?;
    let seconds = src.get_u32();
    let fraction = src.get_u32();
    Ok(TimeTag::new(seconds, fraction))
}

fn take4(src: &mut Bytes) -> Result<[u8; 4]> {
    require(src, 4)?;
    let mut out = [0u8; 4];
    src.copy_to_slice(&mut out);
    Ok(out)
}

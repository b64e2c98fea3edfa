//! Type tag string construction and parsing.

use bytes::{Bytes, BytesMut};

use super::padding::put_padded;
use super::primitive::take_terminated;
use super::{Argument, Error, Result, TypeTag};

/// Append one tag byte per argument; arrays contribute `[`, their
/// sub-tags, then `]`.
pub(crate) fn push_tags(args: &[Argument], out: &mut Vec<u8>) {
    for arg in args {
        out.push(arg.type_tag().as_u8());
        if let Argument::Array(items) = arg {
            push_tags(items, out);
            out.push(TypeTag::ArrayClose.as_u8());
        }
    }
}

/// Tag string for `args`, comma included, without padding.
#[must_use]
pub fn type_tag_string(args: &[Argument]) -> String {
    let mut tags = vec![b','];
    push_tags(args, &mut tags);
    tags.into_iter().map(char::from).collect()
}

/// Write the comma-prefixed, padded tag string.
pub(crate) fn encode_type_tags(args: &[Argument], dst: &mut BytesMut) {
    let mut tags = Vec::with_capacity(args.len() + 1);
    tags.push(b',');
    push_tags(args, &mut tags);
    put_padded(dst, &tags);
}

/// Consume a padded tag string and return its tags, comma stripped.
pub(crate) fn decode_type_tags(src: &mut Bytes) -> Result<Vec<TypeTag>> {
    let raw = take_terminated(src)?;
    match raw.split_first() {
        Some((b',', tags)) => Ok(tags.iter().copied().map(TypeTag::from_u8).collect()),
        _ => Err(Error::MissingTypeTags),
    }
}

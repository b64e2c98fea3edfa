//! 4-byte alignment for strings, symbols and blobs.
//!
//! Variable-length data is always followed by 1..=4 NUL bytes, so a value
//! whose length is already a multiple of 4 still gets a full pad block. For
//! strings the first pad byte doubles as the terminator.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::{Error, Result};

/// Number of pad bytes that follow `len` bytes of variable-length data.
#[inline]
#[must_use]
pub const fn pad_len(len: usize) -> usize {
    4 - (len % 4)
}

/// Total wire size of `len` bytes of data plus padding.
#[inline]
#[must_use]
pub const fn padded_len(len: usize) -> usize {
    len + pad_len(len)
}

/// Write `data` followed by its padding.
pub(crate) fn put_padded(dst: &mut BytesMut, data: &[u8]) {
    dst.reserve(padded_len(data.len()));
    dst.put_slice(data);
    dst.put_bytes(0, pad_len(data.len()));
}

/// Skip the padding that follows a consumed value of `len` bytes.
pub(crate) fn skip_padding(src: &mut Bytes, len: usize) -> Result<()> {
    let pad = pad_len(len);
    require(src, pad)?;
    src.advance(pad);
    Ok(())
}

/// Fail with `Truncated` unless `needed` bytes remain.
#[inline]
pub(crate) fn require(src: &Bytes, needed: usize) -> Result<()> {
    if src.remaining() < needed {
        return Err(Error::Truncated {
            needed,
            got: src.remaining(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_len_always_adds_a_byte() {
        assert_eq!(pad_len(0), 4);
        assert_eq!(pad_len(1), 3);
        assert_eq!(pad_len(3), 1);
        assert_eq!(pad_len(4), 4);
        assert_eq!(padded_len(7), 8);
        assert_eq!(padded_len(8), 12);
    }

    #[test]
    fn test_put_padded_aligned_input() {
        let mut buf = BytesMut::new();
        put_padded(&mut buf, b"abcd");
        assert_eq!(&buf[..], b"abcd\0\0\0\0");
    }

    #[test]
    fn test_skip_padding() {
        let mut src = Bytes::from_static(b"\0\0\0rest");
        skip_padding(&mut src, 5).unwrap();
        assert_eq!(&src[..], b"rest");
    }

    #[test]
    fn test_skip_padding_truncated() {
        let mut src = Bytes::from_static(b"\0");
        let result = skip_padding(&mut src, 4);
        assert!(matches!(
            result,
            Err(Error::Truncated { needed: 4, got: 1 })
        ));
    }
}

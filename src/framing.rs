//! Length-prefixed stream framing.
//!
//! Byte-stream transports such as TCP have no message boundaries, so each
//! encoded packet is preceded by its size:
//!
//! ```text
//! ┌──────────────┬──────────────────────────┐
//! │ Length (4B)  │ Encoded packet           │
//! │ big-endian   │ (Length bytes)           │
//! └──────────────┴──────────────────────────┘
//! ```
//!
//! Datagram transports do not need this; send the output of
//! [`crate::encode`] as-is.

use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::protocol::{DecodeConfig, Error, Packet, Result, decode_with, encode_into};

/// Size of the length prefix in bytes.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Default maximum frame size: 16 MiB.
pub const DEFAULT_MAX_FRAME: usize = 16 * 1024 * 1024;

/// Configuration for stream framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum accepted packet size in bytes. Default: 16 MiB.
    pub max_frame_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME,
        }
    }
}

/// Encode a packet with its length prefix.
pub fn encode_frame(packet: &Packet) -> Result<Bytes> {
    let mut dst = BytesMut::new();
    encode_frame_into(packet, &mut dst)?;
    Ok(dst.freeze())
}

/// Append a length-prefixed packet to `dst`.
pub fn encode_frame_into(packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    let prefix_at = dst.len();
    dst.put_u32(0);
    if let Err(err) = encode_into(packet, dst) {
        dst.truncate(prefix_at);
        return Err(err);
    }

    let size = dst.len() - prefix_at - FRAME_HEADER_SIZE;
    let Ok(len) = u32::try_from(size) else {
        dst.truncate(prefix_at);
        return Err(Error::BlobTooLarge { size });
    };
    dst[prefix_at..prefix_at + FRAME_HEADER_SIZE].copy_from_slice(&len.to_be_bytes());
    Ok(())
}

/// Decode one frame from a buffer.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, consumes the frame bytes from the buffer.
pub fn decode_frame(
    src: &mut BytesMut,
    frame_config: &FrameConfig,
    decode_config: &DecodeConfig,
) -> Result<Option<Packet>> {
    if src.len() < FRAME_HEADER_SIZE {
        return Ok(None);
    }

    let size = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;
    check_size(size, frame_config)?;

    if src.len() - FRAME_HEADER_SIZE < size {
        return Ok(None);
    }

    src.advance(FRAME_HEADER_SIZE);
    let payload = src.split_to(size).freeze();
    decode_with(payload, decode_config).map(Some)
}

/// Read exactly one frame from a blocking stream.
///
/// Returns `Err(Error::ConnectionClosed)` when the stream ends, whether
/// cleanly between frames or in the middle of one.
pub fn read_packet<R: Read>(
    reader: &mut R,
    frame_config: &FrameConfig,
    decode_config: &DecodeConfig,
) -> Result<Packet> {
    let mut header = [0u8; FRAME_HEADER_SIZE];
    read_exact(reader, &mut header)?;
    let size = u32::from_be_bytes(header) as usize;
    check_size(size, frame_config)?;

    let mut payload = vec![0u8; size];
    read_exact(reader, &mut payload)?;
    decode_with(Bytes::from(payload), decode_config)
}

/// Write one length-prefixed packet to a blocking stream.
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let frame = encode_frame(packet)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

fn check_size(size: usize, frame_config: &FrameConfig) -> Result<()> {
    if size > frame_config.max_frame_size {
        debug!(size, max = frame_config.max_frame_size, "rejecting oversized frame");
        return Err(Error::FrameTooLarge {
            size,
            max: frame_config.max_frame_size,
        });
    }
    Ok(())
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            Error::ConnectionClosed
        } else {
            Error::Io(err)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::protocol::{Argument, Bundle, Message, TimeTag};

    fn status() -> Packet {
        Packet::from(Message::new("/status").arg(1_i32))
    }

    #[test]
    fn test_frame_prefix() {
        let frame = encode_frame(&status()).unwrap();
        assert_eq!(&frame[..4], &16u32.to_be_bytes());
        assert_eq!(frame.len(), FRAME_HEADER_SIZE + 16);
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x00, 0x00][..]);
        let result = decode_frame(&mut buf, &FrameConfig::default(), &DecodeConfig::default());
        assert!(result.unwrap().is_none());
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::from(&encode_frame(&status()).unwrap()[..]);
        buf.truncate(FRAME_HEADER_SIZE + 5);
        let result = decode_frame(&mut buf, &FrameConfig::default(), &DecodeConfig::default());
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_multiple_frames() {
        let bundle = Packet::from(
            Bundle::new(TimeTag::new(7, 0)).element(Message::new("/b").arg(Argument::Nil)),
        );
        let mut buf = BytesMut::new();
        encode_frame_into(&status(), &mut buf).unwrap();
        encode_frame_into(&bundle, &mut buf).unwrap();

        let config = FrameConfig::default();
        let decode = DecodeConfig::default();
        assert_eq!(decode_frame(&mut buf, &config, &decode).unwrap(), Some(status()));
        assert_eq!(decode_frame(&mut buf, &config, &decode).unwrap(), Some(bundle));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_frame_too_large() {
        let mut buf = BytesMut::new();
        buf.put_u32(1024);
        let config = FrameConfig { max_frame_size: 64 };
        let result = decode_frame(&mut buf, &config, &DecodeConfig::default());
        assert!(matches!(
            result,
            Err(Error::FrameTooLarge { size: 1024, max: 64 })
        ));
    }

    #[test]
    fn test_unbounded_config_waits_for_huge_frame() {
        let mut buf = BytesMut::new();
        buf.put_u32(u32::MAX);
        buf.put_slice(b"/a\0\0");
        let config = FrameConfig {
            max_frame_size: usize::MAX,
        };
        let result = decode_frame(&mut buf, &config, &DecodeConfig::default());
        assert!(result.unwrap().is_none());
        assert_eq!(buf.len(), FRAME_HEADER_SIZE + 4);
    }

    #[test]
    fn test_stream_roundtrip() {
        let mut wire = Vec::new();
        write_packet(&mut wire, &status()).unwrap();
        write_packet(&mut wire, &Packet::from(Message::default())).unwrap();

        let mut reader = Cursor::new(wire);
        let frame_config = FrameConfig::default();
        let decode_config = DecodeConfig::default();
        let first = read_packet(&mut reader, &frame_config, &decode_config).unwrap();
        let second = read_packet(&mut reader, &frame_config, &decode_config).unwrap();
        assert_eq!(first, status());
        assert_eq!(second, Packet::from(Message::default()));

        let eof = read_packet(&mut reader, &frame_config, &decode_config);
        assert!(matches!(eof, Err(Error::ConnectionClosed)));
    }

    #[test]
    fn test_stream_closed_mid_frame() {
        let mut wire = encode_frame(&status()).unwrap().to_vec();
        wire.truncate(10);
        let mut reader = Cursor::new(wire);
        let result = read_packet(&mut reader, &FrameConfig::default(), &DecodeConfig::default());
        assert!(matches!(result, Err(Error::ConnectionClosed)));
    }

    #[test]
    fn test_encode_error_leaves_buffer_untouched() {
        let mut buf = BytesMut::new();
        let bad = Packet::from(Message::new("/\0"));
        assert!(encode_frame_into(&bad, &mut buf).is_err());
        assert!(buf.is_empty());
    }
}

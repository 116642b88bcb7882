//! Whole-canvas message envelope: serialize, deserialize, merge.
//!
//! A message is `[u64 LE payload length][payload]`, where the payload is the
//! recorded command stream, optionally preceded by the 9-byte
//! default-viewport header `[opcode 255][u64 LE offset]`. The header is
//! always the first record of a stream that carries one, which keeps
//! re-serialization an O(1) in-place patch instead of a rewrite.

use thiserror::Error;

use crate::opcode::OpCode;
use crate::recorder::CanvasRecorder;

/// Size of the `[marker][u64 offset]` viewport header record.
const VIEWPORT_HEADER_LEN: usize = 9;

/// Errors raised while decoding a canvas message.
#[derive(Error, Debug)]
pub enum WireError {
    /// Fewer than 8 bytes: no room for the length prefix
    #[error("message too short for its length prefix ({0} bytes)")]
    MissingLength(usize),

    /// Length prefix promises more payload than the message holds
    #[error("message truncated: length prefix says {expected} bytes, found {found}")]
    Truncated { expected: u64, found: usize },
}

/// True when the stream already begins with a viewport header record.
fn starts_with_viewport_header(bytes: &[u8]) -> bool {
    bytes.first() == Some(&(OpCode::DefaultViewportOffset as u8))
}

/// Parse the offset out of a leading viewport header, if present.
fn parse_viewport_header(bytes: &[u8]) -> Option<u64> {
    if starts_with_viewport_header(bytes) && bytes.len() >= VIEWPORT_HEADER_LEN {
        let mut offset = [0u8; 8];
        offset.copy_from_slice(&bytes[1..VIEWPORT_HEADER_LEN]);
        Some(u64::from_le_bytes(offset))
    } else {
        None
    }
}

/// Serialize the recorded stream into a length-prefixed message.
///
/// With a default viewport set, either patches the existing leading header
/// in place (stream deserialized from a header-carrying message) or emits a
/// synthetic header into the output only — the recorded stream itself is
/// not modified, so serializing twice yields byte-identical messages.
pub(crate) fn encode_message(rec: &mut CanvasRecorder) -> Vec<u8> {
    let size = rec.buffer.position();

    match rec.default_viewport_offset {
        Some(offset) if starts_with_viewport_header(rec.buffer.as_slice()) => {
            rec.buffer.seek(1);
            rec.buffer.write_u64(offset);
            rec.buffer.seek(size);

            let mut out = Vec::with_capacity(8 + size);
            out.extend_from_slice(&(size as u64).to_le_bytes());
            out.extend_from_slice(&rec.buffer.as_slice()[..size]);
            out
        }
        Some(offset) => {
            let mut out = Vec::with_capacity(8 + VIEWPORT_HEADER_LEN + size);
            out.extend_from_slice(&((VIEWPORT_HEADER_LEN + size) as u64).to_le_bytes());
            out.push(OpCode::DefaultViewportOffset as u8);
            out.extend_from_slice(&offset.to_le_bytes());
            out.extend_from_slice(&rec.buffer.as_slice()[..size]);
            out
        }
        None => {
            let mut out = Vec::with_capacity(8 + size);
            out.extend_from_slice(&(size as u64).to_le_bytes());
            out.extend_from_slice(&rec.buffer.as_slice()[..size]);
            out
        }
    }
}

/// Restore a canvas from a length-prefixed message.
///
/// The payload replaces the recorded stream, the cursor parks at its end
/// (further drawing appends), and a leading viewport header is parsed back
/// into the in-memory offset. Nothing past the first byte is interpreted.
pub(crate) fn decode_message(rec: &mut CanvasRecorder, bytes: &[u8]) -> Result<(), WireError> {
    if bytes.len() < 8 {
        return Err(WireError::MissingLength(bytes.len()));
    }
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&bytes[..8]);
    let expected = u64::from_le_bytes(prefix);

    let payload = &bytes[8..];
    if (payload.len() as u64) < expected {
        return Err(WireError::Truncated {
            expected,
            found: payload.len(),
        });
    }

    rec.buffer.load(&payload[..expected as usize]);
    rec.default_viewport_offset = parse_viewport_header(rec.buffer.as_slice());
    rec.entering_path_mode = false;
    rec.in_path_mode = false;
    Ok(())
}

/// Append another canvas's recorded commands onto `dst`.
///
/// Rejected (logged, nothing copied) while either canvas has a just-started
/// path with no segments. An open path on `dst` is implicitly abandoned,
/// exactly as an ordinary drawing command would. A viewport carried by the
/// source stays relative to its own commands at their new position.
pub(crate) fn merge_canvases(dst: &mut CanvasRecorder, src: &CanvasRecorder) {
    if dst.entering_path_mode || src.entering_path_mode {
        tracing::error!("append_canvas: a path was just started; merge has no effect");
        return;
    }
    dst.in_path_mode = false;

    let insert_at = dst.buffer.position() as u64;
    if let Some(src_offset) = src.default_viewport_offset {
        if dst.default_viewport_offset.is_none()
            && !starts_with_viewport_header(dst.buffer.as_slice())
        {
            dst.default_viewport_offset = Some(insert_at + src_offset);
        }
    }

    let src_size = src.buffer.position();
    dst.buffer.write_raw(&src.buffer.as_slice()[..src_size]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder_with(bytes: &[u8]) -> CanvasRecorder {
        let mut rec = CanvasRecorder::new();
        rec.buffer.write_raw(bytes);
        rec
    }

    #[test]
    fn test_encode_without_viewport_is_verbatim() {
        let mut rec = recorder_with(&[1, 2, 3]);
        let msg = encode_message(&mut rec);
        assert_eq!(&msg[..8], &3u64.to_le_bytes());
        assert_eq!(&msg[8..], &[1, 2, 3]);
    }

    #[test]
    fn test_encode_prepends_header_without_touching_stream() {
        let mut rec = recorder_with(&[7, 7]);
        rec.default_viewport_offset = Some(1);

        let first = encode_message(&mut rec);
        assert_eq!(&first[..8], &11u64.to_le_bytes());
        assert_eq!(first[8], OpCode::DefaultViewportOffset as u8);
        assert_eq!(&first[9..17], &1u64.to_le_bytes());
        assert_eq!(&first[17..], &[7, 7]);
        // The recorded stream itself gained no header.
        assert_eq!(rec.buffer.as_slice(), &[7, 7]);

        let second = encode_message(&mut rec);
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_patches_existing_header() {
        let mut rec = CanvasRecorder::new();
        rec.buffer.write_u8(OpCode::DefaultViewportOffset as u8);
        rec.buffer.write_u64(99);
        rec.buffer.write_raw(&[4, 5]);
        rec.default_viewport_offset = Some(2);

        let msg = encode_message(&mut rec);
        assert_eq!(&msg[..8], &11u64.to_le_bytes());
        assert_eq!(msg[8], OpCode::DefaultViewportOffset as u8);
        // Stale stored offset was patched in place.
        assert_eq!(&msg[9..17], &2u64.to_le_bytes());
        assert_eq!(&rec.buffer.as_slice()[1..9], &2u64.to_le_bytes());
        // Cursor is back at the end for further appends.
        assert_eq!(rec.buffer.position(), 11);
    }

    #[test]
    fn test_decode_restores_viewport_and_cursor() {
        let mut src = recorder_with(&[1, 2, 3, 4]);
        src.default_viewport_offset = Some(2);
        let msg = encode_message(&mut src);

        let mut dst = CanvasRecorder::new();
        decode_message(&mut dst, &msg).unwrap();
        assert_eq!(dst.default_viewport_offset, Some(2));
        assert_eq!(dst.buffer.position(), 13);
        assert!(!dst.in_path_mode);
    }

    #[test]
    fn test_decode_rejects_short_input() {
        let mut rec = CanvasRecorder::new();
        assert!(matches!(
            decode_message(&mut rec, &[0, 0]),
            Err(WireError::MissingLength(2))
        ));

        let mut msg = Vec::from(10u64.to_le_bytes());
        msg.extend_from_slice(&[1, 2, 3]);
        assert!(matches!(
            decode_message(&mut rec, &msg),
            Err(WireError::Truncated {
                expected: 10,
                found: 3
            })
        ));
    }

    #[test]
    fn test_merge_offsets_viewport_by_destination_size() {
        let mut src = recorder_with(&[1, 2, 3, 4, 5]);
        src.default_viewport_offset = Some(3);

        let mut empty = CanvasRecorder::new();
        merge_canvases(&mut empty, &src);
        assert_eq!(empty.default_viewport_offset, Some(3));
        assert_eq!(empty.buffer.as_slice(), &[1, 2, 3, 4, 5]);

        let mut busy = recorder_with(&[9, 9]);
        merge_canvases(&mut busy, &src);
        assert_eq!(busy.default_viewport_offset, Some(2 + 3));
        assert_eq!(busy.buffer.as_slice(), &[9, 9, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_merge_keeps_existing_viewport() {
        let mut src = recorder_with(&[1]);
        src.default_viewport_offset = Some(0);

        let mut dst = recorder_with(&[2]);
        dst.default_viewport_offset = Some(7);
        merge_canvases(&mut dst, &src);
        assert_eq!(dst.default_viewport_offset, Some(7));
    }

    #[test]
    fn test_merge_rejected_mid_path_entry() {
        let mut src = recorder_with(&[1]);
        src.entering_path_mode = true;
        src.in_path_mode = true;

        let mut dst = recorder_with(&[2]);
        merge_canvases(&mut dst, &src);
        assert_eq!(dst.buffer.as_slice(), &[2]);
    }
}

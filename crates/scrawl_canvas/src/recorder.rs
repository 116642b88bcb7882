//! Shared append engine and path-mode state machine.
//!
//! `CanvasRecorder` is the value both canvas types embed: it owns the
//! command buffer, the optional default-viewport offset and the two
//! path-mode flags, and funnels every command through the tagged append
//! helpers. Sequencing mistakes never fail hard — they are logged and
//! dropped, leaving buffer and flags untouched, so a drawing mistake cannot
//! take down a recording session.

use scrawl_core::CommandBuffer;

use crate::opcode::OpCode;
use crate::scalar::{CanvasElement, CanvasScalar};

/// Append engine + path state shared by [`crate::Canvas2D`] and
/// [`crate::Canvas3D`].
#[derive(Debug, Default)]
pub(crate) struct CanvasRecorder {
    /// Buffer all recorded geometry is serialized to
    pub(crate) buffer: CommandBuffer,
    /// Byte offset of the viewport-defining commands, when recorded
    pub(crate) default_viewport_offset: Option<u64>,
    /// True from a path start until the first segment/curve lands
    pub(crate) entering_path_mode: bool,
    /// True from a path start until an explicit close or implicit abandonment
    pub(crate) in_path_mode: bool,
}

impl CanvasRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn position(&self) -> usize {
        self.buffer.position()
    }

    /// Remove all recorded commands and reset every piece of canvas state.
    pub(crate) fn clear(&mut self) {
        self.buffer.clear();
        self.default_viewport_offset = None;
        self.entering_path_mode = false;
        self.in_path_mode = false;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Appending
    // ─────────────────────────────────────────────────────────────────────

    /// `[opcode][tag][elements]`, all little-endian.
    pub(crate) fn append_command<S: CanvasScalar>(&mut self, opcode: OpCode, values: &[S]) {
        self.buffer.write_u8(opcode as u8);
        self.append_data(values);
    }

    /// `[opcode][raw bytes]` — for byte-oriented operands that need no tag.
    pub(crate) fn append_command_raw(&mut self, opcode: OpCode, bytes: &[u8]) {
        self.buffer.write_u8(opcode as u8);
        self.buffer.write_raw(bytes);
    }

    /// Bare `[opcode]`; the caller writes its own operands afterwards.
    pub(crate) fn append_opcode(&mut self, opcode: OpCode) {
        self.buffer.write_u8(opcode as u8);
    }

    /// `[tag][element bytes]` — used after an explicit or implicit count.
    pub(crate) fn append_data<E: CanvasElement>(&mut self, items: &[E]) {
        self.buffer.write_u8(E::Scalar::TAG as u8);
        if cfg!(target_endian = "little") {
            self.buffer.write_raw(bytemuck::cast_slice(items));
        } else {
            for item in items {
                item.write_components(&mut self.buffer);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Path-mode guards
    // ─────────────────────────────────────────────────────────────────────

    /// Guard for every ordinary (non-path) command. Rejected while a path
    /// was just started and has no segments yet; otherwise an open path is
    /// implicitly abandoned (no terminator opcode is written).
    pub(crate) fn leave_path_mode(&mut self, command: &str) -> bool {
        if self.entering_path_mode {
            tracing::error!("{}: path was just started; command has no effect", command);
            return false;
        }
        self.in_path_mode = false;
        true
    }

    /// Guard for `start_path`/`start_shape`: a second start while the
    /// previous one has no segments would record a zero-length path.
    pub(crate) fn enter_path_mode(&mut self, command: &str) -> bool {
        if self.entering_path_mode {
            tracing::error!("{}: path was just started; command has no effect", command);
            return false;
        }
        self.entering_path_mode = true;
        self.in_path_mode = true;
        true
    }

    /// Guard for segment/curve appends: only valid inside a path; the first
    /// successful append leaves the entering state.
    pub(crate) fn continue_path(&mut self, command: &str) -> bool {
        if !self.in_path_mode {
            tracing::error!("{}: not in path mode; command has no effect", command);
            return false;
        }
        self.entering_path_mode = false;
        true
    }

    /// Guard for `close_path`/`close_shape`: closing requires at least one
    /// recorded segment, so a just-started path stays open and in path mode.
    pub(crate) fn end_path_mode(&mut self, command: &str) -> bool {
        if !self.in_path_mode {
            tracing::error!("{}: not in path mode; command has no effect", command);
            return false;
        }
        if self.entering_path_mode {
            tracing::error!("{}: path has no segments yet; command has no effect", command);
            return false;
        }
        self.in_path_mode = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::NumberTag;

    #[test]
    fn test_append_command_layout() {
        let mut rec = CanvasRecorder::new();
        rec.append_command(OpCode::DrawPoint, &[1.5f32, -2.25]);
        assert_eq!(
            rec.buffer.as_slice(),
            &[
                OpCode::DrawPoint as u8,
                NumberTag::Float as u8,
                0x00,
                0x00,
                0xC0,
                0x3F,
                0x00,
                0x00,
                0x10,
                0xC0,
            ]
        );
    }

    #[test]
    fn test_append_command_raw_layout() {
        let mut rec = CanvasRecorder::new();
        rec.append_command_raw(OpCode::SetColor, &[10, 20, 30]);
        assert_eq!(
            rec.buffer.as_slice(),
            &[OpCode::SetColor as u8, 10, 20, 30]
        );
    }

    #[test]
    fn test_rejected_guard_leaves_state_untouched() {
        let mut rec = CanvasRecorder::new();
        assert!(rec.enter_path_mode("start_path"));
        let before = rec.buffer.len();

        assert!(!rec.leave_path_mode("draw_point"));
        assert!(!rec.enter_path_mode("start_path"));
        assert!(!rec.end_path_mode("close_path"));

        assert_eq!(rec.buffer.len(), before);
        assert!(rec.in_path_mode);
        assert!(rec.entering_path_mode);
    }

    #[test]
    fn test_close_requires_a_segment() {
        let mut rec = CanvasRecorder::new();
        assert!(rec.enter_path_mode("start_path"));
        assert!(rec.continue_path("append_line_segment"));
        assert!(!rec.entering_path_mode);
        assert!(rec.end_path_mode("close_path"));
        assert!(!rec.in_path_mode);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut rec = CanvasRecorder::new();
        rec.append_opcode(OpCode::ResetTransformation);
        rec.default_viewport_offset = Some(7);
        rec.enter_path_mode("start_path");
        rec.clear();
        assert!(rec.buffer.is_empty());
        assert_eq!(rec.default_viewport_offset, None);
        assert!(!rec.in_path_mode);
        assert!(!rec.entering_path_mode);
    }
}

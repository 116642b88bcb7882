//! Growable command byte buffer.
//!
//! `CommandBuffer` is the storage every recorded drawing command lands in:
//! an append-only byte vector plus a write cursor. The cursor normally sits
//! at the end of the data; rewinding it with [`CommandBuffer::seek`] lets a
//! caller overwrite a fixed-width field in place (the default-viewport
//! header patch) without rewriting the stream.
//!
//! All multi-byte integers are written little-endian. Writes are immediate;
//! `position()` is always final.

/// Append-oriented byte buffer with a movable write cursor.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    data: Vec<u8>,
    cursor: usize,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    /// Current logical write offset.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Total bytes stored (>= position when the cursor was rewound).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Drop all contents and rewind the cursor.
    pub fn clear(&mut self) {
        self.data.clear();
        self.cursor = 0;
    }

    /// Move the write cursor. Offsets beyond the stored data are clamped to
    /// the end; subsequent writes there append as usual.
    pub fn seek(&mut self, offset: usize) {
        self.cursor = offset.min(self.data.len());
    }

    /// Replace the contents with `bytes` and park the cursor at the end,
    /// ready for further appends.
    pub fn load(&mut self, bytes: &[u8]) {
        self.data.clear();
        self.data.extend_from_slice(bytes);
        self.cursor = self.data.len();
    }

    /// Write raw bytes at the cursor: overwrites stored bytes while the
    /// cursor is inside the data, then appends the remainder.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        if end <= self.data.len() {
            self.data[self.cursor..end].copy_from_slice(bytes);
        } else {
            let overlap = self.data.len() - self.cursor;
            self.data[self.cursor..].copy_from_slice(&bytes[..overlap]);
            self.data.extend_from_slice(&bytes[overlap..]);
        }
        self.cursor = end;
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_raw(&[v]);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.write_u8(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_raw(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.write_raw(&v.to_le_bytes());
    }

    /// Length-prefixed UTF-8 string: u32 byte length, then the bytes.
    /// No NUL terminator.
    pub fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_raw(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_tracks_position() {
        let mut buf = CommandBuffer::new();
        assert_eq!(buf.position(), 0);
        buf.write_u8(0xAB);
        buf.write_u16(0x0102);
        assert_eq!(buf.position(), 3);
        assert_eq!(buf.as_slice(), &[0xAB, 0x02, 0x01]);
    }

    #[test]
    fn test_little_endian_integers() {
        let mut buf = CommandBuffer::new();
        buf.write_u32(0x0A0B0C0D);
        buf.write_u64(1);
        assert_eq!(
            buf.as_slice(),
            &[0x0D, 0x0C, 0x0B, 0x0A, 1, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_seek_overwrites_in_place() {
        let mut buf = CommandBuffer::new();
        buf.write_u8(0xFF);
        buf.write_u64(0);
        buf.seek(1);
        buf.write_u64(0x1122);
        assert_eq!(buf.len(), 9);
        assert_eq!(buf.position(), 9);
        assert_eq!(&buf.as_slice()[1..3], &[0x22, 0x11]);
    }

    #[test]
    fn test_overwrite_straddling_end_grows() {
        let mut buf = CommandBuffer::new();
        buf.write_raw(&[1, 2, 3]);
        buf.seek(2);
        buf.write_raw(&[9, 9, 9]);
        assert_eq!(buf.as_slice(), &[1, 2, 9, 9, 9]);
    }

    #[test]
    fn test_load_parks_cursor_at_end() {
        let mut buf = CommandBuffer::new();
        buf.load(&[5, 6, 7]);
        assert_eq!(buf.position(), 3);
        buf.write_u8(8);
        assert_eq!(buf.as_slice(), &[5, 6, 7, 8]);
    }

    #[test]
    fn test_length_prefixed_string() {
        let mut buf = CommandBuffer::new();
        buf.write_str("hi");
        assert_eq!(buf.as_slice(), &[2, 0, 0, 0, b'h', b'i']);
    }
}

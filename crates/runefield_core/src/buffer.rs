//! Gap-buffered byte storage for editor contents.
//!
//! Offsets are storage (byte) offsets into the logical text. Content is
//! normally UTF-8, but malformed bytes are tolerated: decoding never fails
//! and yields `U+FFFD` with an encoded size of one byte instead.

use std::ops::Range;

/// Initial gap reserved by a fresh buffer.
const DEFAULT_GAP_SIZE: usize = 64;

/// Minimum number of bytes the gap grows by when it runs out.
const MIN_GAP_GROW: usize = 64;

/// Code point yielded for malformed byte sequences.
pub const REPLACEMENT_CHAR: char = char::REPLACEMENT_CHARACTER;

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Expected sequence length for a leading byte, `None` if it cannot start one.
fn utf8_sequence_len(first: u8) -> Option<usize> {
    match first {
        0x00..=0x7F => Some(1),
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Editable byte storage with a movable gap.
///
/// ```text
///  [ before-gap | gap | after-gap ]
///    0..gap_start       gap_end..buf.len()
/// ```
#[derive(Clone, Debug)]
pub struct EditBuffer {
    buf: Vec<u8>,
    gap_start: usize,
    gap_end: usize,
    revision: u64,
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EditBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; DEFAULT_GAP_SIZE],
            gap_start: 0,
            gap_end: DEFAULT_GAP_SIZE,
            revision: 0,
        }
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes().to_vec())
    }

    /// Create a buffer from raw bytes, which need not be valid UTF-8.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        bytes.resize(len + DEFAULT_GAP_SIZE, 0);
        Self {
            buf: bytes,
            gap_start: len,
            gap_end: len + DEFAULT_GAP_SIZE,
            revision: 0,
        }
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.buf.len() - self.gap_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn gap_size(&self) -> usize {
        self.gap_end - self.gap_start
    }

    fn byte_at(&self, ofs: usize) -> u8 {
        if ofs < self.gap_start {
            self.buf[ofs]
        } else {
            self.buf[ofs + self.gap_size()]
        }
    }

    /// Decode the code point starting at `ofs`.
    ///
    /// Returns `None` at or past the end of content.
    pub fn code_point_at(&self, ofs: usize) -> Option<(char, usize)> {
        if ofs >= self.len() {
            return None;
        }
        let first = self.byte_at(ofs);
        let Some(size) = utf8_sequence_len(first) else {
            return Some((REPLACEMENT_CHAR, 1));
        };
        if size == 1 {
            return Some((char::from(first), 1));
        }
        if ofs + size > self.len() {
            return Some((REPLACEMENT_CHAR, 1));
        }
        let mut tmp = [0u8; 4];
        for (i, slot) in tmp.iter_mut().enumerate().take(size) {
            *slot = self.byte_at(ofs + i);
        }
        match std::str::from_utf8(&tmp[..size]) {
            Ok(decoded) => decoded
                .chars()
                .next()
                .map(|c| (c, size))
                .or(Some((REPLACEMENT_CHAR, 1))),
            Err(_) => Some((REPLACEMENT_CHAR, 1)),
        }
    }

    /// Decode the code point ending at `ofs`.
    ///
    /// Returns `None` at the start of content. A sequence whose forward decode
    /// does not end exactly at `ofs` yields the replacement code point.
    pub fn code_point_before(&self, ofs: usize) -> Option<(char, usize)> {
        let end = ofs.min(self.len());
        if end == 0 {
            return None;
        }
        let limit = end.saturating_sub(4);
        let mut start = end - 1;
        while start > limit && is_continuation(self.byte_at(start)) {
            start -= 1;
        }
        match self.code_point_at(start) {
            Some((c, size)) if start + size == end => Some((c, size)),
            _ => Some((REPLACEMENT_CHAR, 1)),
        }
    }

    fn move_gap(&mut self, ofs: usize) {
        if ofs < self.gap_start {
            let count = self.gap_start - ofs;
            self.buf
                .copy_within(ofs..self.gap_start, self.gap_end - count);
            self.gap_start = ofs;
            self.gap_end -= count;
        } else if ofs > self.gap_start {
            let count = ofs - self.gap_start;
            self.buf
                .copy_within(self.gap_end..self.gap_end + count, self.gap_start);
            self.gap_start += count;
            self.gap_end += count;
        }
    }

    fn ensure_gap(&mut self, needed: usize) {
        if self.gap_size() >= needed {
            return;
        }
        let grow = needed.max(MIN_GAP_GROW).max(self.len() / 2);
        let tail = self.buf.split_off(self.gap_end);
        self.buf.truncate(self.gap_start);
        self.buf.resize(self.gap_start + grow, 0);
        self.gap_end = self.buf.len();
        self.buf.extend_from_slice(&tail);
    }

    /// Insert `text` at storage offset `ofs` (clamped to the content length).
    pub fn insert(&mut self, ofs: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let ofs = ofs.min(self.len());
        let bytes = text.as_bytes();
        self.move_gap(ofs);
        self.ensure_gap(bytes.len());
        self.buf[self.gap_start..self.gap_start + bytes.len()].copy_from_slice(bytes);
        self.gap_start += bytes.len();
        self.revision = self.revision.wrapping_add(1);
    }

    /// Delete `len` bytes starting at `ofs`, clamped to the content.
    ///
    /// Returns the number of bytes actually removed.
    pub fn delete_range(&mut self, ofs: usize, len: usize) -> usize {
        let start = ofs.min(self.len());
        let end = start.saturating_add(len).min(self.len());
        if start == end {
            return 0;
        }
        self.move_gap(start);
        self.gap_end += end - start;
        self.revision = self.revision.wrapping_add(1);
        end - start
    }

    /// Remove all content.
    pub fn clear(&mut self) {
        let len = self.len();
        self.delete_range(0, len);
    }

    /// Raw bytes in `range`, clamped to the content.
    fn bytes(&self, range: Range<usize>) -> Vec<u8> {
        let start = range.start.min(self.len());
        let end = range.end.min(self.len());
        if start >= end {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(end - start);
        if start < self.gap_start {
            out.extend_from_slice(&self.buf[start..end.min(self.gap_start)]);
        }
        if end > self.gap_start {
            let from = start.max(self.gap_start) + self.gap_size();
            out.extend_from_slice(&self.buf[from..end + self.gap_size()]);
        }
        out
    }

    /// Text in the byte `range`; malformed bytes become `U+FFFD`.
    pub fn slice(&self, range: Range<usize>) -> String {
        String::from_utf8_lossy(&self.bytes(range)).into_owned()
    }

    /// Whole content as a string; malformed bytes become `U+FFFD`.
    pub fn contents(&self) -> String {
        self.slice(0..self.len())
    }

    /// Forward code-point iterator over the whole content.
    pub fn runes(&self) -> Runes<'_> {
        Runes {
            buffer: self,
            ofs: 0,
        }
    }

    /// Number of code points as seen by the decoder.
    pub fn rune_count(&self) -> usize {
        self.runes().count()
    }
}

/// Iterator decoding an [`EditBuffer`] front to back.
pub struct Runes<'a> {
    buffer: &'a EditBuffer,
    ofs: usize,
}

impl Iterator for Runes<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let (c, size) = self.buffer.code_point_at(self.ofs)?;
        self.ofs += size;
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_multibyte_in_both_directions() {
        let buf = EditBuffer::from_text("aé€😀");
        assert_eq!(buf.code_point_at(0), Some(('a', 1)));
        assert_eq!(buf.code_point_at(1), Some(('é', 2)));
        assert_eq!(buf.code_point_at(3), Some(('€', 3)));
        assert_eq!(buf.code_point_at(6), Some(('😀', 4)));
        assert_eq!(buf.code_point_at(10), None);

        assert_eq!(buf.code_point_before(10), Some(('😀', 4)));
        assert_eq!(buf.code_point_before(6), Some(('€', 3)));
        assert_eq!(buf.code_point_before(3), Some(('é', 2)));
        assert_eq!(buf.code_point_before(1), Some(('a', 1)));
        assert_eq!(buf.code_point_before(0), None);
    }

    #[test]
    fn malformed_bytes_decode_to_single_byte_replacement() {
        let buf = EditBuffer::from_bytes(vec![b'a', 0xE2, 0x82, b'b', 0xFF]);
        assert_eq!(buf.code_point_at(1), Some((REPLACEMENT_CHAR, 1)));
        assert_eq!(buf.code_point_at(2), Some((REPLACEMENT_CHAR, 1)));
        assert_eq!(buf.code_point_at(3), Some(('b', 1)));
        assert_eq!(buf.code_point_at(4), Some((REPLACEMENT_CHAR, 1)));
        assert_eq!(buf.code_point_before(3), Some((REPLACEMENT_CHAR, 1)));
        assert_eq!(buf.code_point_before(2), Some((REPLACEMENT_CHAR, 1)));
        assert_eq!(buf.rune_count(), 5);
    }

    #[test]
    fn truncated_sequence_at_end_is_replacement() {
        let buf = EditBuffer::from_bytes(vec![b'x', 0xF0, 0x9F]);
        assert_eq!(buf.code_point_at(1), Some((REPLACEMENT_CHAR, 1)));
        assert_eq!(buf.code_point_before(3), Some((REPLACEMENT_CHAR, 1)));
    }

    #[test]
    fn insert_and_delete_across_gap_moves() {
        let mut buf = EditBuffer::from_text("hello world");
        buf.insert(5, ",");
        assert_eq!(buf.contents(), "hello, world");
        buf.insert(0, ">> ");
        assert_eq!(buf.contents(), ">> hello, world");
        assert_eq!(buf.delete_range(3, 7), 7);
        assert_eq!(buf.contents(), ">> world");
        buf.insert(buf.len(), "!");
        assert_eq!(buf.contents(), ">> world!");
        assert_eq!(buf.slice(3..8), "world");
    }

    #[test]
    fn growth_preserves_content_and_bumps_revision() {
        let mut buf = EditBuffer::new();
        let chunk = "x".repeat(100);
        buf.insert(0, &chunk);
        buf.insert(50, "ÿ");
        assert_eq!(buf.len(), 102);
        assert_eq!(buf.rune_count(), 101);
        assert_eq!(buf.revision(), 2);
        assert_eq!(buf.delete_range(200, 3), 0);
        assert_eq!(buf.revision(), 2);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.revision(), 3);
    }
}

// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

#[derive(Debug, PartialEq)]
pub enum StreamBufferError {
    /// Growing was requested to a size that is not larger
    CannotGrow,
    /// No unread bytes left
    Drained,
    UnreadPastStart,
    /// A window position or range outside the filled bytes
    OutOfBounds,
}

/// The byte window a cursor reads from.
///
/// `bytes[..filled]` is valid data and `bytes[read..filled]` is still unread.
/// Readers write straight into `bytes[filled..]`. Dropping a prefix adds its
/// length to `origin`, the absolute stream offset of `bytes[0]`, so marks
/// taken as absolute offsets stay meaningful across refills.
pub struct StreamBuffer {
    bytes: Vec<u8>,
    read: usize,
    filled: usize,
    origin: usize,
}

impl StreamBuffer {
    /// An empty window that a reader will fill.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: alloc::vec![0; capacity.max(1)],
            read: 0,
            filled: 0,
            origin: 0,
        }
    }

    /// A window holding a complete document.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            filled: bytes.len(),
            bytes,
            read: 0,
            origin: 0,
        }
    }

    /// Replace the contents with a new complete document, keeping the allocation.
    pub fn reset_with(&mut self, data: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(data);
        self.rewind_all(data.len());
    }

    /// Drop all data ahead of a new streaming session.
    pub fn reset_empty(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        if self.bytes.len() < capacity {
            self.bytes.resize(capacity, 0);
        }
        self.rewind_all(0);
    }

    fn rewind_all(&mut self, filled: usize) {
        self.read = 0;
        self.filled = filled;
        self.origin = 0;
    }

    pub fn next_byte(&mut self) -> Result<u8, StreamBufferError> {
        let byte = self.byte_at(self.read).ok_or(StreamBufferError::Drained)?;
        self.read += 1;
        Ok(byte)
    }

    /// Skip up to `count` unread bytes; returns how many were skipped.
    pub fn advance_by(&mut self, count: usize) -> usize {
        let step = count.min(self.unread_len());
        self.read += step;
        step
    }

    pub fn unread(&mut self) -> Result<(), StreamBufferError> {
        self.read = self
            .read
            .checked_sub(1)
            .ok_or(StreamBufferError::UnreadPastStart)?;
        Ok(())
    }

    pub fn unread_len(&self) -> usize {
        self.filled.saturating_sub(self.read)
    }

    pub fn is_drained(&self) -> bool {
        self.read >= self.filled
    }

    /// Read position inside the window.
    pub fn position(&self) -> usize {
        self.read
    }

    pub fn set_position(&mut self, pos: usize) -> Result<(), StreamBufferError> {
        if pos > self.filled {
            return Err(StreamBufferError::OutOfBounds);
        }
        self.read = pos;
        Ok(())
    }

    /// Absolute stream offset of the first byte in the window.
    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn filled_len(&self) -> usize {
        self.filled
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn unread_slice(&self) -> &[u8] {
        self.bytes.get(self.read..self.filled).unwrap_or_default()
    }

    /// At most `max` bytes right before the read position, for error context.
    pub fn context_before(&self, max: usize) -> &[u8] {
        let end = self.read.min(self.filled);
        self.bytes
            .get(end.saturating_sub(max)..end)
            .unwrap_or_default()
    }

    /// The free tail a reader should write into, or `None` when the window is full.
    pub fn spare_mut(&mut self) -> Option<&mut [u8]> {
        self.bytes
            .get_mut(self.filled..)
            .filter(|spare| !spare.is_empty())
    }

    /// Record that a reader wrote `count` bytes into the spare tail.
    pub fn commit(&mut self, count: usize) -> Result<(), StreamBufferError> {
        match self.filled.checked_add(count) {
            Some(filled) if filled <= self.bytes.len() => {
                self.filled = filled;
                Ok(())
            }
            _ => Err(StreamBufferError::OutOfBounds),
        }
    }

    /// Discard the first `count` bytes of the window, sliding the rest down.
    ///
    /// Unread bytes cannot be dropped, so `count` may not exceed the read
    /// position. Returns `count`.
    pub fn drop_front(&mut self, count: usize) -> Result<usize, StreamBufferError> {
        if count > self.read {
            return Err(StreamBufferError::OutOfBounds);
        }
        if count > 0 {
            self.bytes.copy_within(count..self.filled, 0);
            self.read -= count;
            self.filled -= count;
            self.origin += count;
        }
        Ok(count)
    }

    /// Enlarge the window to `capacity` bytes without moving any data.
    pub fn grow_to(&mut self, capacity: usize) -> Result<(), StreamBufferError> {
        if capacity <= self.bytes.len() {
            return Err(StreamBufferError::CannotGrow);
        }
        self.bytes.resize(capacity, 0);
        Ok(())
    }

    /// Filled bytes between two window positions.
    pub fn slice(&self, start: usize, end: usize) -> Result<&[u8], StreamBufferError> {
        if end > self.filled {
            return Err(StreamBufferError::OutOfBounds);
        }
        self.bytes.get(start..end).ok_or(StreamBufferError::OutOfBounds)
    }

    pub fn byte_at(&self, index: usize) -> Option<u8> {
        if index < self.filled {
            self.bytes.get(index).copied()
        } else {
            None
        }
    }
}

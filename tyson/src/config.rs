// SPDX-License-Identifier: Apache-2.0

/// Default size of the window allocated for a streaming cursor.
pub const DEFAULT_BUFFER_SIZE: usize = 512;

/// Default limit on array/object nesting for `skip` and `read_value`.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Construction-time settings for a [`Cursor`](crate::Cursor).
///
/// ```
/// use tyson::{ChunkReader, Cursor, CursorConfig};
///
/// let config = CursorConfig::default()
///     .with_buffer_size(16)
///     .with_max_buffer_size(Some(1024))
///     .with_max_depth(8);
/// let cursor = Cursor::with_config(ChunkReader::new(b"[1, 2, 3]", 2), config);
/// # drop(cursor);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    /// Initial window size in streaming mode.
    pub buffer_size: usize,
    /// Upper bound for window growth; `None` lets the window grow without limit.
    pub max_buffer_size: Option<usize>,
    /// Maximum nesting of arrays/objects accepted by recursive readers.
    pub max_depth: usize,
}

impl CursorConfig {
    pub const fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub const fn with_max_buffer_size(mut self, max_buffer_size: Option<usize>) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Next window size when the window is full, or `None` if the limit is reached.
    pub(crate) fn grown_size(&self, current: usize) -> Option<usize> {
        let doubled = current.saturating_mul(2).max(current.saturating_add(1));
        match self.max_buffer_size {
            Some(max) if current >= max => None,
            Some(max) => Some(doubled.min(max)),
            None => Some(doubled),
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self::new()
    }
}

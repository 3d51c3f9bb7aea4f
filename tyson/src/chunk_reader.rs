// SPDX-License-Identifier: Apache-2.0

//! An in-memory [`Reader`] that hands out a document in pieces.
//!
//! Pulling a few bytes at a time makes a streaming [`Cursor`](crate::Cursor)
//! refill its window at every offset, which is how the streaming tests shake
//! out boundary bugs in annotations, escapes and numbers.
//!
//! ```rust
//! use tyson::{ChunkReader, Cursor, ValueKind};
//!
//! let doc = br#"("point") {"x": 1, "y": 2}"#;
//! let mut cursor = Cursor::from_reader(ChunkReader::new(doc, 3));
//! assert_eq!(cursor.what_is_next().unwrap(), ValueKind::UserDefinedObject);
//! assert_eq!(cursor.recover_type_name().unwrap(), "point");
//! ```

use core::convert::Infallible;

use crate::Reader;

/// A [`Reader`] over a byte slice, delivering at most `chunk_size` bytes per pull.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    rest: &'a [u8],
    chunk_size: usize,
    pulls: usize,
}

impl<'a> ChunkReader<'a> {
    /// A chunk size of 0 is treated as 1.
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            rest: data,
            chunk_size: chunk_size.max(1),
            pulls: 0,
        }
    }

    /// Deliver as much as the cursor's window can take on every pull.
    pub fn full_slice(data: &'a [u8]) -> Self {
        Self::new(data, usize::MAX)
    }

    /// Bytes not yet delivered.
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }

    /// How many times the reader was asked for data, end-of-stream included.
    pub fn pulls(&self) -> usize {
        self.pulls
    }
}

impl Reader for ChunkReader<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.pulls += 1;
        let count = self.rest.len().min(buf.len()).min(self.chunk_size);
        let (chunk, rest) = self.rest.split_at(count);
        if let Some(dest) = buf.get_mut(..count) {
            dest.copy_from_slice(chunk);
        }
        self.rest = rest;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cursor, CursorConfig};

    fn pull_all(reader: &mut ChunkReader<'_>, buf_len: usize) -> Vec<Vec<u8>> {
        let mut buf = vec![0u8; buf_len];
        let mut pieces = Vec::new();
        loop {
            let count = reader.read(&mut buf).unwrap();
            if count == 0 {
                return pieces;
            }
            pieces.push(buf[..count].to_vec());
        }
    }

    #[test]
    fn test_chunks_are_capped() {
        let mut reader = ChunkReader::new(br#"("t") [1]"#, 4);
        let pieces = pull_all(&mut reader, 16);
        assert_eq!(pieces, [&b"(\"t\""[..], b") [1", b"]"]);
        assert_eq!(reader.pulls(), 4);
        assert!(reader.remaining().is_empty());
    }

    #[test]
    fn test_window_caps_the_chunk() {
        let mut reader = ChunkReader::new(b"true", 10);
        assert_eq!(pull_all(&mut reader, 3), [&b"tru"[..], b"e"]);
    }

    #[test]
    fn test_full_slice() {
        let mut reader = ChunkReader::full_slice(b"[1, 2]");
        assert_eq!(pull_all(&mut reader, 64), [b"[1, 2]"]);

        let mut reader = ChunkReader::full_slice(b"");
        assert!(pull_all(&mut reader, 8).is_empty());
        assert_eq!(reader.pulls(), 1);
    }

    #[test]
    fn test_zero_chunk_size_is_one() {
        let mut reader = ChunkReader::new(b"null", 0);
        assert_eq!(pull_all(&mut reader, 8).len(), 4);
    }

    #[test]
    fn test_cursor_stops_pulling_at_end() {
        let mut reader = ChunkReader::new(b"[true, false]", 2);
        let config = CursorConfig::new().with_buffer_size(4);
        {
            let mut cursor = Cursor::with_config(&mut reader, config);
            cursor.skip().unwrap();
            cursor.expect_end().unwrap();
            cursor.expect_end().unwrap();
        }
        // Seven chunks of data and one end-of-stream answer
        assert_eq!(reader.pulls(), 8);
    }
}

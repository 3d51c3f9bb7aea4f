// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use log::{debug, trace};

use crate::config::CursorConfig;
use crate::json_number::NumberLexeme;
use crate::parse_error::{ErrorKind, ParseError, UnexpectedState, PEEK_LEN};
use crate::shared::is_whitespace;
use crate::stream_buffer::StreamBuffer;
use crate::{NoSource, Reader};

/// An absolute offset into the input stream.
///
/// Marks stay meaningful when the window is compacted; using a mark whose
/// bytes were already dropped is reported as
/// [`UnexpectedState::MarkDiscarded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(pub(crate) usize);

impl Mark {
    /// Offset from the start of the input.
    pub fn offset(self) -> usize {
        self.0
    }
}

/// A byte cursor over TySON input.
///
/// The cursor owns its byte window. Built with [`Cursor::from_bytes`] the
/// window holds the whole document; built with [`Cursor::from_reader`] the
/// window is refilled from the [`Reader`] whenever the read position reaches
/// the end of valid data.
///
/// Reading follows a classify-then-read protocol: [`what_is_next`] reports
/// the [`ValueKind`](crate::ValueKind) of the next value (resolving any type
/// annotation in front of it) and leaves the cursor on the value's first
/// byte, then the matching reader consumes it.
///
/// ```
/// use tyson::{Cursor, ValueKind};
///
/// let mut cursor = Cursor::from_bytes(r#"("integer") "2""#);
/// assert_eq!(cursor.what_is_next().unwrap(), ValueKind::Number);
/// assert_eq!(cursor.read_i32().unwrap(), 2);
/// ```
///
/// [`what_is_next`]: Cursor::what_is_next
pub struct Cursor<R = NoSource> {
    pub(crate) buffer: StreamBuffer,
    source: Option<R>,
    /// The source returned 0 once; it is not asked again
    source_finished: bool,
    /// Lowest absolute offset a refill must keep in the window
    retain_from: Option<usize>,
    config: CursorConfig,
    /// Reusable decode buffer for strings, field names and type names
    pub(crate) scratch: Vec<u8>,
    pub(crate) number: NumberLexeme,
    depth: usize,
}

impl<R> core::fmt::Debug for Cursor<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cursor")
            .field(
                "position",
                &self.buffer.origin().wrapping_add(self.buffer.position()),
            )
            .field("window", &self.buffer.capacity())
            .field("streaming", &self.source.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Cursor<NoSource> {
    /// A cursor over an empty document.
    fn default() -> Self {
        Self::from_bytes(Vec::<u8>::new())
    }
}

impl Cursor<NoSource> {
    /// Create a cursor over a complete in-memory document.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_bytes_with_config(bytes, CursorConfig::default())
    }

    pub fn from_bytes_with_config(bytes: impl Into<Vec<u8>>, config: CursorConfig) -> Self {
        Self::build(StreamBuffer::from_vec(bytes.into()), None, config)
    }
}

impl<R: Reader> Cursor<R> {
    /// Create a streaming cursor with the default configuration.
    pub fn from_reader(reader: R) -> Self {
        Self::with_config(reader, CursorConfig::default())
    }

    /// Create a streaming cursor.
    ///
    /// The window starts at `config.buffer_size` bytes and grows when a single
    /// value does not fit.
    pub fn with_config(reader: R, config: CursorConfig) -> Self {
        Self::build(
            StreamBuffer::with_capacity(config.buffer_size),
            Some(reader),
            config,
        )
    }

    fn build(buffer: StreamBuffer, source: Option<R>, config: CursorConfig) -> Self {
        Self {
            buffer,
            source,
            source_finished: false,
            retain_from: None,
            config,
            scratch: Vec::new(),
            number: NumberLexeme::new(),
            depth: 0,
        }
    }

    /// Point the cursor at a new complete document, reusing its allocations.
    ///
    /// Any attached reader is dropped.
    pub fn reset(&mut self, bytes: &[u8]) {
        self.buffer.reset_with(bytes);
        self.source = None;
        self.clear_state();
    }

    /// Point the cursor at a new reader, reusing its window.
    pub fn reset_reader(&mut self, reader: R) {
        self.buffer.reset_empty(self.config.buffer_size);
        self.source = Some(reader);
        self.clear_state();
    }

    fn clear_state(&mut self) {
        self.source_finished = false;
        self.retain_from = None;
        self.scratch.clear();
        self.number.clear();
        self.depth = 0;
    }

    /// Detach and return the reader, if any.
    pub fn into_reader(self) -> Option<R> {
        self.source
    }

    pub fn config(&self) -> &CursorConfig {
        &self.config
    }

    /// Absolute offset of the read position.
    pub fn position(&self) -> usize {
        self.buffer.origin().wrapping_add(self.buffer.position())
    }

    /// Remember the current read position.
    pub fn mark(&self) -> Mark {
        Mark(self.position())
    }

    /// Move the read position back (or forward) to `mark`.
    pub fn rewind_to(&mut self, mark: Mark) -> Result<(), ParseError> {
        let index = self.window_index(mark, "rewind_to")?;
        self.buffer
            .set_position(index)
            .map_err(|e| self.report_error("rewind_to", e))
    }

    /// The bytes between `mark` and the read position.
    ///
    /// The view is valid until the cursor is next advanced; in streaming mode
    /// the bytes must have been kept with [`retaining`](Self::retaining).
    pub fn raw_since(&self, mark: Mark) -> Result<&[u8], ParseError> {
        let start = self.window_index(mark, "raw_since")?;
        self.buffer
            .slice(start, self.buffer.position())
            .map_err(|e| self.report_error("raw_since", e))
    }

    pub(crate) fn slice_between(&self, start: Mark, end: Mark) -> Result<&[u8], ParseError> {
        let from = self.window_index(start, "slice_between")?;
        let to = self.window_index(end, "slice_between")?;
        self.buffer
            .slice(from, to)
            .map_err(|e| self.report_error("slice_between", e))
    }

    fn window_index(&self, mark: Mark, operation: &'static str) -> Result<usize, ParseError> {
        mark.0
            .checked_sub(self.buffer.origin())
            .ok_or_else(|| self.report_error(operation, UnexpectedState::MarkDiscarded))
    }

    /// Run `f` while keeping every byte from `mark` onward in the window.
    ///
    /// This is the "skip in progress since" marker: refills during `f` compact
    /// only the bytes before `mark`. Nested calls keep the lowest mark, and the
    /// previous marker is restored when `f` returns.
    pub fn retaining<T>(
        &mut self,
        mark: Mark,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let previous = self.retain_from;
        self.retain_from = Some(previous.map_or(mark.0, |p| p.min(mark.0)));
        let result = f(self);
        self.retain_from = previous;
        result
    }

    /// Build an error for `operation` with the read position and the bytes before it.
    pub fn report_error(&self, operation: &'static str, kind: impl Into<ErrorKind>) -> ParseError {
        let kind = kind.into();
        debug!("{operation}: {kind} at offset {}", self.position());
        ParseError::new(
            kind,
            operation,
            self.position(),
            self.buffer.context_before(PEEK_LEN),
        )
    }

    /// Pull more bytes from the source into the window.
    ///
    /// Returns `Ok(false)` when there is no source or it reached end of stream.
    pub(crate) fn load_more(&mut self) -> Result<bool, ParseError> {
        if self.source.is_none() || self.source_finished {
            return Ok(false);
        }

        let keep_from = match self.retain_from {
            Some(mark) => mark
                .saturating_sub(self.buffer.origin())
                .min(self.buffer.position()),
            None => self.buffer.position(),
        };
        let moved = self
            .buffer
            .drop_front(keep_from)
            .map_err(|e| self.report_error("load_more", e))?;
        if moved > 0 {
            trace!("compacted {moved} bytes, {} kept", self.buffer.filled_len());
        }

        if self.buffer.spare_mut().is_none() {
            let current = self.buffer.capacity();
            let grown = self
                .config
                .grown_size(current)
                .ok_or_else(|| self.report_error("load_more", ErrorKind::BufferCapacityExceeded))?;
            debug!("window full, growing from {current} to {grown} bytes");
            self.buffer
                .grow_to(grown)
                .map_err(|e| self.report_error("load_more", e))?;
        }

        let read = match (self.source.as_mut(), self.buffer.spare_mut()) {
            (Some(source), Some(fill)) => source.read(fill),
            _ => return Ok(false),
        };
        match read {
            Ok(0) => {
                trace!("source finished at offset {}", self.position());
                self.source_finished = true;
                Ok(false)
            }
            Ok(filled) => {
                self.buffer
                    .commit(filled)
                    .map_err(|e| self.report_error("load_more", e))?;
                trace!("refilled {filled} bytes");
                Ok(true)
            }
            Err(_) => Err(self.report_error("load_more", ErrorKind::ReaderError)),
        }
    }

    /// Next byte, or `None` at end of input.
    pub(crate) fn next_byte_opt(&mut self) -> Result<Option<u8>, ParseError> {
        if self.buffer.is_drained() && !self.load_more()? {
            return Ok(None);
        }
        Ok(self.buffer.next_byte().ok())
    }

    /// Next byte; end of input fails with `at_end`.
    pub(crate) fn next_byte_or(
        &mut self,
        operation: &'static str,
        at_end: ErrorKind,
    ) -> Result<u8, ParseError> {
        self.next_byte_opt()?
            .ok_or_else(|| self.report_error(operation, at_end))
    }

    /// Next non-whitespace byte, or `None` at end of input.
    pub(crate) fn next_significant_byte_opt(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            match self.next_byte_opt()? {
                Some(byte) if is_whitespace(byte) => continue,
                other => return Ok(other),
            }
        }
    }

    /// Next non-whitespace byte on behalf of `operation`.
    pub(crate) fn next_token(&mut self, operation: &'static str) -> Result<u8, ParseError> {
        self.next_significant_byte_opt()?
            .ok_or_else(|| self.report_error(operation, ErrorKind::UnexpectedEnd))
    }

    /// Skip whitespace and return the next byte, advancing past it.
    ///
    /// Call [`unread_byte`](Self::unread_byte) to look at it again.
    pub fn next_significant_byte(&mut self) -> Result<u8, ParseError> {
        self.next_token("next_significant_byte")
    }

    /// Step back one byte.
    pub fn unread_byte(&mut self) -> Result<(), ParseError> {
        self.buffer
            .unread()
            .map_err(|e| self.report_error("unread_byte", e))
    }

    /// Advance `count` bytes without looking at them.
    pub(crate) fn skip_fixed_bytes(
        &mut self,
        count: usize,
        operation: &'static str,
    ) -> Result<(), ParseError> {
        let mut remaining = count;
        while remaining > 0 {
            if self.buffer.is_drained() && !self.load_more()? {
                return Err(self.report_error(operation, ErrorKind::UnexpectedEnd));
            }
            remaining -= self.buffer.advance_by(remaining);
        }
        Ok(())
    }

    /// Make sure at least one unread byte is in the window.
    ///
    /// Returns `Ok(false)` at end of input.
    pub(crate) fn ensure_data(&mut self) -> Result<bool, ParseError> {
        if self.buffer.is_drained() {
            return self.load_more();
        }
        Ok(true)
    }

    /// True if only whitespace remains.
    pub fn is_exhausted(&mut self) -> Result<bool, ParseError> {
        match self.next_significant_byte_opt()? {
            None => Ok(true),
            Some(_) => {
                self.unread_byte()?;
                Ok(false)
            }
        }
    }

    /// Fail with `UnexpectedToken` unless only whitespace remains.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.is_exhausted()? {
            Ok(())
        } else {
            Err(self.report_error("expect_end", ErrorKind::UnexpectedToken))
        }
    }

    /// Enter one level of array/object nesting.
    pub(crate) fn enter(&mut self, operation: &'static str) -> Result<(), ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(self.report_error(operation, ErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

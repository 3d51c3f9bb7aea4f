// SPDX-License-Identifier: Apache-2.0

use crate::stream_buffer::StreamBufferError;

/// Number of bytes of left context captured in a [`ParseError`].
pub const PEEK_LEN: usize = 10;

/// Caller-contract violations. These indicate a bug in the code driving the
/// cursor, not malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnexpectedState {
    /// `unread_byte` was called at the start of the window.
    UnreadPastStart,
    /// A mark refers to bytes that were already compacted out of the window.
    MarkDiscarded,
    /// A slice was requested outside the valid part of the window.
    InvalidSliceBounds,
}

/// What went wrong, without positional context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input exhausted where a byte was required.
    UnexpectedEnd,
    /// The bytes at the current position match no grammar alternative.
    UnexpectedToken,
    /// A type annotation is missing a delimiter or its quoted name.
    MalformedTypeDeclaration,
    /// A built-in type annotation disagrees with the literal that follows it.
    TypeMismatch,
    /// A number does not fit the requested width.
    Overflow,
    /// The cursor was driven in a way its contract forbids.
    InternalInconsistency(UnexpectedState),
    /// Input ended inside a quoted string.
    UnterminatedString,
    /// A number lexeme is empty or not a valid number.
    InvalidNumber,
    /// Invalid escape sequence character.
    InvalidEscapeSequence,
    /// Invalid hex digits in Unicode escape sequence.
    InvalidUnicodeHex,
    /// Valid hex but invalid Unicode codepoint (e.g. a lone surrogate).
    InvalidUnicodeCodepoint,
    /// Decoded string content is not valid UTF-8.
    InvalidUtf8,
    /// Error from the underlying reader (I/O error, not end-of-stream)
    ReaderError,
    /// The window would have to grow past the configured maximum.
    BufferCapacityExceeded,
    /// Arrays/objects nest deeper than the configured maximum.
    NestingTooDeep,
}

impl From<StreamBufferError> for ErrorKind {
    fn from(err: StreamBufferError) -> Self {
        match err {
            StreamBufferError::Drained => ErrorKind::UnexpectedEnd,
            StreamBufferError::CannotGrow => ErrorKind::BufferCapacityExceeded,
            StreamBufferError::UnreadPastStart => {
                ErrorKind::InternalInconsistency(UnexpectedState::UnreadPastStart)
            }
            StreamBufferError::OutOfBounds => {
                ErrorKind::InternalInconsistency(UnexpectedState::InvalidSliceBounds)
            }
        }
    }
}

impl From<UnexpectedState> for ErrorKind {
    fn from(state: UnexpectedState) -> Self {
        ErrorKind::InternalInconsistency(state)
    }
}

impl From<core::str::Utf8Error> for ErrorKind {
    fn from(_: core::str::Utf8Error) -> Self {
        ErrorKind::InvalidUtf8
    }
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::InternalInconsistency(state) => write!(f, "InternalInconsistency({state:?})"),
            _ => write!(f, "{self:?}"),
        }
    }
}

/// Errors that can occur while reading from a [`Cursor`](crate::Cursor).
///
/// Every error carries the operation that failed, the absolute stream offset
/// of the read position and up to [`PEEK_LEN`] bytes that precede it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ErrorKind,
    operation: &'static str,
    position: usize,
    peek: [u8; PEEK_LEN],
    peek_len: u8,
}

impl ParseError {
    pub(crate) fn new(
        kind: ErrorKind,
        operation: &'static str,
        position: usize,
        context: &[u8],
    ) -> Self {
        let mut peek = [0u8; PEEK_LEN];
        // Keep the bytes closest to the read position
        let context = context
            .get(context.len().saturating_sub(PEEK_LEN)..)
            .unwrap_or_default();
        for (slot, byte) in peek.iter_mut().zip(context) {
            *slot = *byte;
        }
        Self {
            kind,
            operation,
            position,
            peek,
            peek_len: context.len() as u8,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Name of the cursor operation that failed.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Absolute offset of the read position when the error was raised.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The bytes immediately before the read position.
    pub fn peek(&self) -> &[u8] {
        self.peek.get(..self.peek_len as usize).unwrap_or_default()
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}: {}, head: {}, peek: ",
            self.operation, self.kind, self.position
        )?;
        for byte in self.peek() {
            for c in core::ascii::escape_default(*byte) {
                write!(f, "{}", c as char)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

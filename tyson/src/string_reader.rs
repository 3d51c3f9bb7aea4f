// SPDX-License-Identifier: Apache-2.0

use memchr::memchr2;

use crate::cursor::Mark;
use crate::escape_processor::Unescaper;
use crate::shared::{from_utf8, is_literal_delimiter};
use crate::{Cursor, ErrorKind, ParseError, Reader};

impl<R: Reader> Cursor<R> {
    /// Read a quoted string, decoding escapes.
    ///
    /// The returned text lives in the cursor's scratch buffer and is valid
    /// until the next read.
    pub fn read_string(&mut self) -> Result<&str, ParseError> {
        const OP: &str = "read_string";
        if self.next_token(OP)? != b'"' {
            return Err(self.report_error(OP, ErrorKind::UnexpectedToken));
        }
        self.scratch.clear();
        self.read_string_body(OP)?;
        from_utf8(&self.scratch).map_err(|kind| self.report_error(OP, kind))
    }

    /// Read a quoted string without copying it.
    ///
    /// The view points into the window and is invalidated by the next read.
    /// Escape sequences are not decoded here; a string containing a backslash
    /// fails with `UnexpectedToken`.
    pub fn read_string_as_slice(&mut self) -> Result<&[u8], ParseError> {
        const OP: &str = "read_string_as_slice";
        if self.next_token(OP)? != b'"' {
            return Err(self.report_error(OP, ErrorKind::UnexpectedToken));
        }
        let start = self.mark();
        let end = self.retaining(start, |cursor| cursor.find_unescaped_end(OP))?;
        self.slice_between(start, end)
    }

    /// Read a bare word up to the next delimiter, e.g. `hello` in `hello, world`.
    pub fn read_unquoted_literal(&mut self) -> Result<&str, ParseError> {
        const OP: &str = "read_unquoted_literal";
        self.next_token(OP)?;
        self.unread_byte()?;
        self.scratch.clear();
        while let Some(byte) = self.next_byte_opt()? {
            if is_literal_delimiter(byte) {
                self.unread_byte()?;
                break;
            }
            self.scratch.push(byte);
        }
        if self.scratch.is_empty() {
            return Err(self.report_error(OP, ErrorKind::UnexpectedToken));
        }
        from_utf8(&self.scratch).map_err(|kind| self.report_error(OP, kind))
    }

    /// Decode string content into `scratch` up to and including the closing quote.
    ///
    /// The opening quote must already be consumed. Plain runs are copied in
    /// bulk, so refills only happen at window boundaries.
    pub(crate) fn read_string_body(&mut self, op: &'static str) -> Result<(), ParseError> {
        let mut unescaper = Unescaper::default();
        loop {
            if !self.ensure_data()? {
                return Err(self.report_error(op, ErrorKind::UnterminatedString));
            }

            let chunk = self.buffer.unread_slice();
            let run = memchr2(b'"', b'\\', chunk).unwrap_or(chunk.len());
            if run > 0 {
                unescaper
                    .no_pending_surrogate()
                    .map_err(|kind| self.report_error(op, kind))?;
                self.scratch
                    .extend_from_slice(chunk.get(..run).unwrap_or_default());
                self.buffer.advance_by(run);
                continue;
            }

            if self.next_byte_or(op, ErrorKind::UnterminatedString)? == b'"' {
                return unescaper
                    .no_pending_surrogate()
                    .map_err(|kind| self.report_error(op, kind));
            }
            // memchr2 stopped on a backslash
            let decoded = match self.next_byte_or(op, ErrorKind::UnterminatedString)? {
                b'u' => {
                    let mut hex = [0u8; 4];
                    for slot in hex.iter_mut() {
                        *slot = self.next_byte_or(op, ErrorKind::UnterminatedString)?;
                    }
                    unescaper.unicode(&hex, &mut self.scratch)
                }
                escape => unescaper.simple(escape).map(|byte| self.scratch.push(byte)),
            };
            decoded.map_err(|kind| self.report_error(op, kind))?;
        }
    }

    /// Skip string content up to and including the closing quote.
    pub(crate) fn skip_string_body(&mut self, op: &'static str) -> Result<(), ParseError> {
        loop {
            if !self.ensure_data()? {
                return Err(self.report_error(op, ErrorKind::UnterminatedString));
            }
            let found = {
                let chunk = self.buffer.unread_slice();
                match memchr2(b'"', b'\\', chunk) {
                    Some(index) => chunk.get(index).map(|byte| (index, *byte)),
                    None => {
                        let len = chunk.len();
                        self.buffer.advance_by(len);
                        continue;
                    }
                }
            };
            if let Some((index, byte)) = found {
                self.buffer.advance_by(index + 1);
                if byte == b'"' {
                    return Ok(());
                }
                // Whatever follows a backslash cannot close the string
                self.next_byte_or(op, ErrorKind::UnterminatedString)?;
            }
        }
    }

    /// Scan to the closing quote of an escape-free string; returns its mark.
    fn find_unescaped_end(&mut self, op: &'static str) -> Result<Mark, ParseError> {
        loop {
            if !self.ensure_data()? {
                return Err(self.report_error(op, ErrorKind::UnterminatedString));
            }
            let chunk = self.buffer.unread_slice();
            let found = memchr2(b'"', b'\\', chunk).and_then(|i| chunk.get(i).map(|b| (i, *b)));
            let len = chunk.len();
            match found {
                Some((index, b'"')) => {
                    self.buffer.advance_by(index);
                    let end = self.mark();
                    self.buffer.advance_by(1);
                    return Ok(end);
                }
                Some((index, _)) => {
                    self.buffer.advance_by(index);
                    return Err(self.report_error(op, ErrorKind::UnexpectedToken));
                }
                None => {
                    self.buffer.advance_by(len);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ChunkReader, Cursor, CursorConfig, ErrorKind};
    use test_log::test;

    #[test]
    fn test_read_plain_string() {
        let mut cursor = Cursor::from_bytes(r#"  "hello world" "#);
        assert_eq!(cursor.read_string().unwrap(), "hello world");
        assert!(cursor.is_exhausted().unwrap());
    }

    #[test]
    fn test_read_escaped_string() {
        let mut cursor = Cursor::from_bytes(r#""a\"b\\c\/d\n\t\u0041\u00e9""#);
        assert_eq!(cursor.read_string().unwrap(), "a\"b\\c/d\n\tAé");
    }

    #[test]
    fn test_surrogate_pair() {
        let mut cursor = Cursor::from_bytes(r#""\ud83d\ude00!""#);
        assert_eq!(cursor.read_string().unwrap(), "😀!");
    }

    #[test]
    fn test_broken_surrogates() {
        for doc in [r#""\ud83d""#, r#""\ud83dx""#, r#""\ude00""#, r#""\ud83d\n""#] {
            let mut cursor = Cursor::from_bytes(doc);
            assert_eq!(
                cursor.read_string().unwrap_err().kind(),
                ErrorKind::InvalidUnicodeCodepoint,
                "{doc}"
            );
        }
    }

    #[test]
    fn test_string_errors() {
        let mut cursor = Cursor::from_bytes(r#""never closed"#);
        assert_eq!(
            cursor.read_string().unwrap_err().kind(),
            ErrorKind::UnterminatedString
        );

        let mut cursor = Cursor::from_bytes("42");
        assert_eq!(
            cursor.read_string().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );

        let mut cursor = Cursor::from_bytes(r#""\q""#);
        assert_eq!(
            cursor.read_string().unwrap_err().kind(),
            ErrorKind::InvalidEscapeSequence
        );

        let mut cursor = Cursor::from_bytes(r#""\u12x4""#);
        assert_eq!(
            cursor.read_string().unwrap_err().kind(),
            ErrorKind::InvalidUnicodeHex
        );

        let mut cursor = Cursor::from_bytes(&b"\"\xff\""[..]);
        assert_eq!(
            cursor.read_string().unwrap_err().kind(),
            ErrorKind::InvalidUtf8
        );
    }

    #[test]
    fn test_streamed_string_crosses_refills() {
        let doc = r#""stream me \uD83D\uDE00 across chunks""#;
        for chunk in 1..doc.len() {
            let config = CursorConfig::new().with_buffer_size(4);
            let mut cursor = Cursor::with_config(ChunkReader::new(doc.as_bytes(), chunk), config);
            assert_eq!(
                cursor.read_string().unwrap(),
                "stream me 😀 across chunks",
                "chunk size {chunk}"
            );
        }
    }

    #[test]
    fn test_string_as_slice() {
        let mut cursor = Cursor::from_bytes(r#" "raw bytes", "x""#);
        assert_eq!(cursor.read_string_as_slice().unwrap(), b"raw bytes");
        assert_eq!(cursor.next_significant_byte().unwrap(), b',');
        assert_eq!(cursor.read_string_as_slice().unwrap(), b"x");
    }

    #[test]
    fn test_string_as_slice_streaming() {
        let doc = br#""a longer string than the window""#;
        let config = CursorConfig::new().with_buffer_size(3);
        let mut cursor = Cursor::with_config(ChunkReader::new(doc, 2), config);
        assert_eq!(
            cursor.read_string_as_slice().unwrap(),
            b"a longer string than the window"
        );
    }

    #[test]
    fn test_string_as_slice_rejects_escapes() {
        let mut cursor = Cursor::from_bytes(r#""a\nb""#);
        assert_eq!(
            cursor.read_string_as_slice().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );
    }

    #[test]
    fn test_unquoted_literal() {
        let mut cursor = Cursor::from_bytes("  hello, world");
        assert_eq!(cursor.read_unquoted_literal().unwrap(), "hello");
        assert_eq!(cursor.next_significant_byte().unwrap(), b',');
        assert_eq!(cursor.read_unquoted_literal().unwrap(), "world");

        let mut cursor = Cursor::from_bytes("  ]");
        assert_eq!(
            cursor.read_unquoted_literal().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );
    }

    #[test]
    fn test_skip_string_body() {
        let mut cursor = Cursor::from_bytes(r#""a\"b\\" rest"#);
        assert_eq!(cursor.next_significant_byte().unwrap(), b'"');
        cursor.skip_string_body("test").unwrap();
        assert_eq!(cursor.read_unquoted_literal().unwrap(), "rest");
    }
}

// SPDX-License-Identifier: Apache-2.0

use crate::cursor::Mark;
use crate::json_number::is_number_byte;
use crate::shared::{from_utf8, is_literal_delimiter, is_type_declaration_start};
use crate::{Cursor, ErrorKind, ParseError, Reader, ValueKind};

/// A value captured as the exact bytes it occupies in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawValue<'a> {
    /// Kind reported by `what_is_next` before the value was skipped.
    pub kind: ValueKind,
    /// Where the value starts, after any type annotation.
    pub start: Mark,
    pub bytes: &'a [u8],
}

impl<R: Reader> Cursor<R> {
    /// Advance through an array.
    ///
    /// Call it once to consume `[` and then once after every element. Returns
    /// `true` while another element follows and `false` at the closing `]`.
    /// `null` reads as an empty array.
    ///
    /// ```
    /// use tyson::Cursor;
    ///
    /// let mut cursor = Cursor::from_bytes("[1, 2, 3]");
    /// let mut sum = 0;
    /// while cursor.read_array().unwrap() {
    ///     sum += cursor.read_i32().unwrap();
    /// }
    /// assert_eq!(sum, 6);
    /// ```
    pub fn read_array(&mut self) -> Result<bool, ParseError> {
        const OP: &str = "read_array";
        match self.next_token(OP)? {
            b'[' => {
                if self.next_token(OP)? == b']' {
                    return Ok(false);
                }
                self.unread_byte()?;
                Ok(true)
            }
            b',' => Ok(true),
            b']' => Ok(false),
            b'n' => {
                self.skip_fixed_bytes(3, OP)?;
                Ok(false)
            }
            _ => Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
        }
    }

    /// Call `callback` once per array element.
    ///
    /// The callback must consume the element and returns `false` to stop
    /// early. Returns `true` if the whole array was visited.
    pub fn read_array_cb<F>(&mut self, mut callback: F) -> Result<bool, ParseError>
    where
        F: FnMut(&mut Self) -> Result<bool, ParseError>,
    {
        while self.read_array()? {
            if !callback(self)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Advance through an object.
    ///
    /// Call it once to consume `{` and the first field name, then once after
    /// every field value. Returns the next field name, or `None` at the
    /// closing `}`. `null` reads as an empty object.
    pub fn read_object(&mut self) -> Result<Option<&str>, ParseError> {
        const OP: &str = "read_object";
        match self.next_token(OP)? {
            b'{' => match self.next_token(OP)? {
                b'"' => self.read_field_name(OP).map(Some),
                b'}' => Ok(None),
                _ => Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
            },
            b',' => {
                if self.next_token(OP)? != b'"' {
                    return Err(self.report_error(OP, ErrorKind::UnexpectedToken));
                }
                self.read_field_name(OP).map(Some)
            }
            b'}' => Ok(None),
            b'n' => {
                self.skip_fixed_bytes(3, OP)?;
                Ok(None)
            }
            _ => Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
        }
    }

    /// Call `callback` with each field name; it must consume the field value.
    ///
    /// Returning `false` from the callback stops early. Returns `true` if the
    /// whole object was visited.
    pub fn read_object_cb<F>(&mut self, mut callback: F) -> Result<bool, ParseError>
    where
        F: FnMut(&mut Self, &str) -> Result<bool, ParseError>,
    {
        while self.read_object()?.is_some() {
            // The name lives in scratch, which the callback's own reads reuse
            let field = core::mem::take(&mut self.scratch);
            let name = from_utf8(&field).map_err(|kind| self.report_error("read_object_cb", kind))?;
            let keep_going = callback(self, name);
            if self.scratch.capacity() < field.capacity() {
                self.scratch = field;
            }
            if !keep_going? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Read `name"` and the following `:`; the opening quote is already consumed.
    fn read_field_name(&mut self, op: &'static str) -> Result<&str, ParseError> {
        self.scratch.clear();
        self.read_string_body(op)?;
        if self.next_token(op)? != b':' {
            return Err(self.report_error(op, ErrorKind::UnexpectedToken));
        }
        from_utf8(&self.scratch).map_err(|kind| self.report_error(op, kind))
    }

    /// Skip the next value, including any type annotation in front of it.
    ///
    /// The bytes of the value are kept in the window while skipping, so
    /// [`raw_since`](Self::raw_since) can return them afterwards.
    pub fn skip(&mut self) -> Result<(), ParseError> {
        self.next_token("skip")?;
        self.unread_byte()?;
        let start = self.mark();
        self.retaining(start, |cursor| cursor.skip_value())
    }

    fn skip_value(&mut self) -> Result<(), ParseError> {
        const OP: &str = "skip";
        match self.next_token(OP)? {
            b'"' => self.skip_string_body(OP),
            b'-' | b'0'..=b'9' => self.skip_number(),
            b't' | b'n' => self.skip_fixed_bytes(3, OP),
            b'f' => self.skip_fixed_bytes(4, OP),
            b'[' => {
                self.enter(OP)?;
                let result = self.skip_array();
                self.leave();
                result
            }
            b'{' => {
                self.enter(OP)?;
                let result = self.skip_object();
                self.leave();
                result
            }
            b'(' => {
                self.unread_byte()?;
                self.read_type_declaration()?;
                if is_type_declaration_start(self.next_token(OP)?) {
                    return Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration));
                }
                self.unread_byte()?;
                self.skip_value()
            }
            byte if !is_literal_delimiter(byte) => self.skip_bare_word(),
            _ => Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
        }
    }

    /// Rest of an unquoted literal such as `bare` in `[bare]`.
    fn skip_bare_word(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.next_byte_opt()? {
            if is_literal_delimiter(byte) {
                return self.unread_byte();
            }
        }
        Ok(())
    }

    fn skip_number(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.next_byte_opt()? {
            if !is_number_byte(byte) {
                return self.unread_byte();
            }
        }
        Ok(())
    }

    fn skip_array(&mut self) -> Result<(), ParseError> {
        const OP: &str = "skip";
        if self.next_token(OP)? == b']' {
            return Ok(());
        }
        self.unread_byte()?;
        loop {
            self.skip_value()?;
            match self.next_token(OP)? {
                b',' => continue,
                b']' => return Ok(()),
                _ => return Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
            }
        }
    }

    fn skip_object(&mut self) -> Result<(), ParseError> {
        const OP: &str = "skip";
        match self.next_token(OP)? {
            b'}' => return Ok(()),
            b'"' => {}
            _ => return Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
        }
        loop {
            self.skip_string_body(OP)?;
            if self.next_token(OP)? != b':' {
                return Err(self.report_error(OP, ErrorKind::UnexpectedToken));
            }
            self.skip_value()?;
            match self.next_token(OP)? {
                b',' => {
                    if self.next_token(OP)? != b'"' {
                        return Err(self.report_error(OP, ErrorKind::UnexpectedToken));
                    }
                }
                b'}' => return Ok(()),
                _ => return Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
            }
        }
    }

    /// Classify and skip the next value, returning its exact bytes.
    ///
    /// A type annotation is resolved first and is not part of the bytes.
    pub fn read_raw(&mut self) -> Result<RawValue<'_>, ParseError> {
        let kind = self.what_is_next()?;
        let start = self.mark();
        self.skip()?;
        let bytes = self.raw_since(start)?;
        Ok(RawValue { kind, start, bytes })
    }
}

#[cfg(test)]
mod tests {
    use crate::{ChunkReader, Cursor, CursorConfig, ErrorKind, ValueKind};
    use test_log::test;

    #[test]
    fn test_empty_containers() {
        let mut cursor = Cursor::from_bytes("[ ] { } null null");
        assert!(!cursor.read_array().unwrap());
        assert_eq!(cursor.read_object().unwrap(), None);
        assert!(!cursor.read_array().unwrap());
        assert_eq!(cursor.read_object().unwrap(), None);
        cursor.expect_end().unwrap();
    }

    #[test]
    fn test_object_fields_in_order() {
        let mut cursor = Cursor::from_bytes(r#"{"a": 1, "b!": "x", "c": true}"#);
        assert_eq!(cursor.read_object().unwrap(), Some("a"));
        assert_eq!(cursor.read_i32().unwrap(), 1);
        assert_eq!(cursor.read_object().unwrap(), Some("b!"));
        assert_eq!(cursor.read_string().unwrap(), "x");
        assert_eq!(cursor.read_object().unwrap(), Some("c"));
        assert!(cursor.read_boolean().unwrap());
        assert_eq!(cursor.read_object().unwrap(), None);
    }

    #[test]
    fn test_object_missing_colon() {
        let mut cursor = Cursor::from_bytes(r#"{"a" 1}"#);
        assert_eq!(
            cursor.read_object().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );
    }

    #[test]
    fn test_array_callback() {
        let mut cursor = Cursor::from_bytes("[1, 2, 3, 4]");
        let mut seen = Vec::new();
        let complete = cursor
            .read_array_cb(|c| {
                seen.push(c.read_i32()?);
                Ok(seen.len() < 2)
            })
            .unwrap();
        assert!(!complete);
        assert_eq!(seen, [1, 2]);
    }

    #[test]
    fn test_object_callback_with_nested_reads() {
        let mut cursor = Cursor::from_bytes(r#"{"name": "pt", "tags": {"k": "v"}, "n": 3}"#);
        let mut fields = Vec::new();
        let complete = cursor
            .read_object_cb(|c, name| {
                fields.push(String::from(name));
                match name {
                    "name" => {
                        c.read_string()?;
                    }
                    "tags" => {
                        c.read_object_cb(|c, _| {
                            c.read_string()?;
                            Ok(true)
                        })?;
                    }
                    _ => c.skip()?,
                }
                Ok(true)
            })
            .unwrap();
        assert!(complete);
        assert_eq!(fields, ["name", "tags", "n"]);
    }

    #[test]
    fn test_skip_values() {
        let doc = r#"[{"a": [1, "x\"y", null]}, -1.5e3, true, false, ("p") {"q": []}, "s"] 7"#;
        let mut cursor = Cursor::from_bytes(doc);
        cursor.skip().unwrap();
        assert_eq!(cursor.read_i32().unwrap(), 7);
    }

    #[test]
    fn test_skip_bare_words() {
        let doc = br#"["a", bare] 7"#;
        for chunk in 1..doc.len() {
            let config = CursorConfig::new().with_buffer_size(2);
            let mut cursor = Cursor::with_config(ChunkReader::new(doc, chunk), config);
            cursor.skip().unwrap();
            assert_eq!(cursor.read_i32().unwrap(), 7, "chunk size {chunk}");
        }

        let mut cursor = Cursor::from_bytes(r#"{"k": word, "n": 1} tail"#);
        let raw = cursor.read_raw().unwrap();
        assert_eq!(raw.bytes, br#"{"k": word, "n": 1}"#);
        let raw = cursor.read_raw().unwrap();
        assert_eq!(raw.kind, ValueKind::Invalid);
        assert_eq!(raw.bytes, b"tail");
        cursor.expect_end().unwrap();

        let mut cursor = Cursor::from_bytes("]");
        assert_eq!(cursor.skip().unwrap_err().kind(), ErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_skip_depth_limit() {
        let config = CursorConfig::new().with_max_depth(2);
        let mut cursor = Cursor::from_bytes_with_config("[[[1]]]", config);
        assert_eq!(cursor.skip().unwrap_err().kind(), ErrorKind::NestingTooDeep);

        let mut cursor = Cursor::from_bytes_with_config("[[1]]", config);
        cursor.skip().unwrap();
    }

    #[test]
    fn test_skip_rejects_garbage() {
        let mut cursor = Cursor::from_bytes("[1 2]");
        assert_eq!(cursor.skip().unwrap_err().kind(), ErrorKind::UnexpectedToken);
        let mut cursor = Cursor::from_bytes("[1,");
        assert_eq!(cursor.skip().unwrap_err().kind(), ErrorKind::UnexpectedEnd);
    }

    #[test]
    fn test_read_raw() {
        let mut cursor = Cursor::from_bytes(r#"  {"a": [1, 2]} , ("point") [3,4]"#);
        let raw = cursor.read_raw().unwrap();
        assert_eq!(raw.kind, ValueKind::Object);
        assert_eq!(raw.bytes, br#"{"a": [1, 2]}"#);
        assert_eq!(raw.start.offset(), 2);
        assert_eq!(cursor.next_significant_byte().unwrap(), b',');
        let raw = cursor.read_raw().unwrap();
        assert_eq!(raw.kind, ValueKind::UserDefinedArray);
        assert_eq!(raw.bytes, b"[3,4]");
    }

    #[test]
    fn test_read_raw_streaming() {
        let doc = br#"[{"long field name": "and a long value"}, 2]"#;
        for chunk in 1..8 {
            let config = CursorConfig::new().with_buffer_size(4);
            let mut cursor = Cursor::with_config(ChunkReader::new(doc, chunk), config);
            assert!(cursor.read_array().unwrap());
            let raw = cursor.read_raw().unwrap();
            assert_eq!(raw.bytes, br#"{"long field name": "and a long value"}"#);
            assert!(cursor.read_array().unwrap());
            assert_eq!(cursor.read_i32().unwrap(), 2);
            assert!(!cursor.read_array().unwrap());
        }
    }
}

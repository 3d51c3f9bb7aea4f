// SPDX-License-Identifier: Apache-2.0

use crate::{Cursor, ErrorKind, ParseError, Reader, ValueKind};

impl<R: Reader> Cursor<R> {
    /// Read `true` or `false`.
    ///
    /// Only the first byte is checked. The quoted forms `"true"` and
    /// `"false"` are accepted as well.
    pub fn read_boolean(&mut self) -> Result<bool, ParseError> {
        const OP: &str = "read_boolean";
        match self.next_token(OP)? {
            b't' => {
                self.skip_fixed_bytes(3, OP)?;
                Ok(true)
            }
            b'f' => {
                self.skip_fixed_bytes(4, OP)?;
                Ok(false)
            }
            b'"' => {
                self.scratch.clear();
                self.read_string_body(OP)?;
                match self.scratch.as_slice() {
                    b"true" => Ok(true),
                    b"false" => Ok(false),
                    _ => Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
                }
            }
            _ => Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
        }
    }

    /// Consume a `null` if one is next.
    ///
    /// Returns `false` and leaves the cursor where it was when the next value
    /// is anything else. A quoted `"null"` counts as null.
    pub fn read_null(&mut self) -> Result<bool, ParseError> {
        const OP: &str = "read_null";
        match self.next_token(OP)? {
            b'n' => {
                self.skip_fixed_bytes(3, OP)?;
                Ok(true)
            }
            b'"' => {
                self.unread_byte()?;
                let start = self.mark();
                self.retaining(start, |cursor| {
                    cursor.next_token(OP)?;
                    cursor.scratch.clear();
                    cursor.read_string_body(OP)?;
                    if cursor.scratch == b"null" {
                        return Ok(true);
                    }
                    cursor.rewind_to(start)?;
                    Ok(false)
                })
            }
            _ => {
                self.unread_byte()?;
                Ok(false)
            }
        }
    }

    /// Read the text of the next atomic value.
    ///
    /// Strings are decoded, numbers keep their exact text, booleans and null
    /// come back as their keywords and a bare word is returned as written.
    /// An annotation in front of the value is resolved and dropped.
    pub fn read_literal(&mut self) -> Result<&str, ParseError> {
        const OP: &str = "read_literal";
        match self.what_is_next()? {
            ValueKind::String => self.read_string(),
            ValueKind::Number => self.read_number_str(),
            ValueKind::Boolean => Ok(if self.read_boolean()? { "true" } else { "false" }),
            ValueKind::Null => {
                if self.read_null()? {
                    Ok("null")
                } else {
                    Err(self.report_error(OP, ErrorKind::UnexpectedToken))
                }
            }
            ValueKind::UserDefinedAtomic => self.read_literal(),
            ValueKind::Invalid => self.read_unquoted_literal(),
            ValueKind::Array
            | ValueKind::Object
            | ValueKind::UserDefinedArray
            | ValueKind::UserDefinedObject => {
                Err(self.report_error(OP, ErrorKind::UnexpectedToken))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cursor, ErrorKind};
    use test_log::test;

    #[test]
    fn test_booleans() {
        let mut cursor = Cursor::from_bytes(r#"true false "true" "false""#);
        assert!(cursor.read_boolean().unwrap());
        assert!(!cursor.read_boolean().unwrap());
        assert!(cursor.read_boolean().unwrap());
        assert!(!cursor.read_boolean().unwrap());
        cursor.expect_end().unwrap();
    }

    #[test]
    fn test_boolean_errors() {
        let mut cursor = Cursor::from_bytes("1");
        assert_eq!(
            cursor.read_boolean().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );
        let mut cursor = Cursor::from_bytes(r#""yes""#);
        assert_eq!(
            cursor.read_boolean().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );
        let mut cursor = Cursor::from_bytes("tr");
        assert_eq!(
            cursor.read_boolean().unwrap_err().kind(),
            ErrorKind::UnexpectedEnd
        );
    }

    #[test]
    fn test_null() {
        let mut cursor = Cursor::from_bytes(r#"null "null" 5"#);
        assert!(cursor.read_null().unwrap());
        assert!(cursor.read_null().unwrap());
        assert!(!cursor.read_null().unwrap());
        assert_eq!(cursor.read_i32().unwrap(), 5);
    }

    #[test]
    fn test_null_leaves_other_strings_unread() {
        let mut cursor = Cursor::from_bytes(r#"  "nothing""#);
        assert!(!cursor.read_null().unwrap());
        assert_eq!(cursor.read_string().unwrap(), "nothing");
    }

    #[test]
    fn test_read_literal() {
        let mut cursor = Cursor::from_bytes(r#""a\nb" -1.5e3 true null bare"#);
        assert_eq!(cursor.read_literal().unwrap(), "a\nb");
        assert_eq!(cursor.read_literal().unwrap(), "-1.5e3");
        assert_eq!(cursor.read_literal().unwrap(), "true");
        assert_eq!(cursor.read_literal().unwrap(), "null");
        assert_eq!(cursor.read_literal().unwrap(), "bare");
    }

    #[test]
    fn test_read_literal_under_annotation() {
        let mut cursor = Cursor::from_bytes(r#"("my-atomic") "hello" ("integer") "2""#);
        assert_eq!(cursor.read_literal().unwrap(), "hello");
        assert_eq!(cursor.read_literal().unwrap(), "2");
    }

    #[test]
    fn test_read_literal_rejects_containers() {
        let mut cursor = Cursor::from_bytes("[1]");
        assert_eq!(
            cursor.read_literal().unwrap_err().kind(),
            ErrorKind::UnexpectedToken
        );
    }
}

// SPDX-License-Identifier: Apache-2.0

//! Type annotations: `("name")` in front of a value.
//!
//! Built-in names constrain the literal that follows; any other name marks a
//! user-defined type whose underlying value is read with the ordinary readers.

use alloc::string::String;
use alloc::vec::Vec;

use log::trace;

use crate::cursor::Mark;
use crate::escape_processor::unescape_into;
use crate::json_number::is_number_lexeme;
use crate::shared::{from_utf8, is_type_declaration_start, is_whitespace};
use crate::{Cursor, ErrorKind, ParseError, Reader, ValueKind};

/// Type names with built-in meaning.
pub const BUILTIN_TYPE_NAMES: [&str; 8] = [
    "string", "integer", "decimal", "double", "boolean", "null", "object", "array",
];

/// The kind a built-in type name requires, or `None` for user-defined names.
pub fn builtin_kind(name: &str) -> Option<ValueKind> {
    match name {
        "string" => Some(ValueKind::String),
        "integer" | "decimal" | "double" => Some(ValueKind::Number),
        "boolean" => Some(ValueKind::Boolean),
        "null" => Some(ValueKind::Null),
        "object" => Some(ValueKind::Object),
        "array" => Some(ValueKind::Array),
        _ => None,
    }
}

/// A type annotation read from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeAnnotation<'a> {
    name: &'a str,
    start: Mark,
    end: Mark,
}

impl<'a> TypeAnnotation<'a> {
    /// The decoded type name, without quotes.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Offset of the opening parenthesis.
    pub fn start(&self) -> Mark {
        self.start
    }

    /// Offset just past the closing parenthesis.
    pub fn end(&self) -> Mark {
        self.end
    }

    pub fn is_builtin(&self) -> bool {
        builtin_kind(self.name).is_some()
    }
}

impl<R: Reader> Cursor<R> {
    /// Report the kind of the next value without consuming it.
    ///
    /// A type annotation in front of the value is consumed and resolved:
    ///
    /// - a built-in name must agree with the literal, otherwise the call fails
    ///   with `TypeMismatch`. A quoted literal is accepted where its content
    ///   has the declared kind, e.g. `("boolean") "true"`.
    /// - any other name yields one of the user-defined kinds, depending on
    ///   whether the value is atomic, an array or an object.
    ///
    /// In every successful case the cursor is left on the first byte of the
    /// value, and for user-defined kinds
    /// [`recover_type_name`](Self::recover_type_name) can still see the name.
    pub fn what_is_next(&mut self) -> Result<ValueKind, ParseError> {
        self.what_is_next_named().map(|(kind, _)| kind)
    }

    /// Like [`what_is_next`](Self::what_is_next), also handing out the name
    /// of a user-defined annotation as it was read going forward.
    pub(crate) fn what_is_next_named(
        &mut self,
    ) -> Result<(ValueKind, Option<String>), ParseError> {
        let byte = self.next_token("what_is_next")?;
        self.unread_byte()?;
        let kind = ValueKind::of_byte(byte);
        if kind != ValueKind::Invalid || !is_type_declaration_start(byte) {
            return Ok((kind, None));
        }
        let start = self.mark();
        self.retaining(start, |cursor| cursor.resolve_type_declaration())
    }

    /// Read a `("name")` annotation and leave the cursor after it.
    ///
    /// Whitespace is allowed around the quoted name. A missing parenthesis
    /// or name fails with `MalformedTypeDeclaration`.
    pub fn read_type_declaration(&mut self) -> Result<TypeAnnotation<'_>, ParseError> {
        const OP: &str = "read_type_declaration";
        if !is_type_declaration_start(self.next_token(OP)?) {
            return Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration));
        }
        let start = Mark(self.position().saturating_sub(1));
        if self.next_significant_byte_opt()? != Some(b'"') {
            return Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration));
        }
        self.scratch.clear();
        self.read_string_body(OP)?;
        if self.scratch.is_empty() || self.next_significant_byte_opt()? != Some(b')') {
            return Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration));
        }
        let end = self.mark();
        let name = from_utf8(&self.scratch).map_err(|kind| self.report_error(OP, kind))?;
        Ok(TypeAnnotation { name, start, end })
    }

    /// Returns the resolved kind, and the name when it is user-defined.
    fn resolve_type_declaration(&mut self) -> Result<(ValueKind, Option<String>), ParseError> {
        const OP: &str = "what_is_next";
        let (declared, user_name) = {
            let annotation = self.read_type_declaration()?;
            trace!(
                "type declaration {:?} at {}",
                annotation.name(),
                annotation.start().offset()
            );
            match builtin_kind(annotation.name()) {
                Some(kind) => (Some(kind), None),
                None => (None, Some(String::from(annotation.name()))),
            }
        };

        let byte = self.next_token(OP)?;
        self.unread_byte()?;
        if is_type_declaration_start(byte) {
            return Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration));
        }
        let provided = ValueKind::of_byte(byte);

        let kind = match declared {
            Some(expected) if expected == provided => provided,
            Some(expected) if provided == ValueKind::String => self.coerce_quoted(expected)?,
            Some(_) => return Err(self.report_error(OP, ErrorKind::TypeMismatch)),
            None => match provided {
                ValueKind::String | ValueKind::Number | ValueKind::Boolean | ValueKind::Null => {
                    ValueKind::UserDefinedAtomic
                }
                ValueKind::Array => ValueKind::UserDefinedArray,
                ValueKind::Object => ValueKind::UserDefinedObject,
                _ => return Err(self.report_error(OP, ErrorKind::UnexpectedToken)),
            },
        };
        Ok((kind, user_name))
    }

    /// Look inside a quoted literal for the kind its content spells.
    ///
    /// The cursor is put back on the opening quote either way.
    fn coerce_quoted(&mut self, expected: ValueKind) -> Result<ValueKind, ParseError> {
        const OP: &str = "what_is_next";
        let start = self.mark();
        self.next_token(OP)?;
        self.scratch.clear();
        self.read_string_body(OP)?;
        let corrected = match self.scratch.as_slice() {
            b"true" | b"false" => ValueKind::Boolean,
            b"null" => ValueKind::Null,
            text if is_number_lexeme(text) => ValueKind::Number,
            _ => ValueKind::Invalid,
        };
        self.rewind_to(start)?;
        if corrected == expected {
            trace!("quoted literal accepted as {corrected:?}");
            Ok(corrected)
        } else {
            Err(self.report_error(OP, ErrorKind::TypeMismatch))
        }
    }

    /// Find the name of the annotation that ends right before the read position.
    ///
    /// Scans backward over whitespace to `)`, then to the nearest `(` whose
    /// body is a quoted name. A `(` preceded by `/` never opens an annotation.
    /// Must be called before the value is read; in streaming mode the
    /// annotation is only guaranteed to be in the window until the next refill.
    pub fn recover_type_name(&self) -> Result<String, ParseError> {
        const OP: &str = "recover_type_name";
        let buffer = &self.buffer;

        let mut close = buffer.position();
        while close > 0 && buffer.byte_at(close - 1).is_some_and(is_whitespace) {
            close -= 1;
        }
        if close == 0 || buffer.byte_at(close - 1) != Some(b')') {
            return Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration));
        }
        close -= 1;

        // A name may itself hold `(`, so keep going until the body parses
        let mut open = close;
        while open > 0 {
            open -= 1;
            let escaped = open > 0 && buffer.byte_at(open - 1) == Some(b'/');
            if buffer.byte_at(open) != Some(b'(') || escaped {
                continue;
            }
            let body = buffer
                .slice(open + 1, close)
                .map_err(|e| self.report_error(OP, e))?;
            if let Some(quoted) = quoted_name(body) {
                let mut name = Vec::with_capacity(quoted.len());
                unescape_into(quoted, &mut name).map_err(|kind| self.report_error(OP, kind))?;
                return String::from_utf8(name)
                    .map_err(|_| self.report_error(OP, ErrorKind::InvalidUtf8));
            }
        }
        Err(self.report_error(OP, ErrorKind::MalformedTypeDeclaration))
    }
}

/// The inside of `"..."` once surrounding whitespace is trimmed.
fn quoted_name(body: &[u8]) -> Option<&[u8]> {
    match trim_whitespace(body) {
        [b'"', inner @ .., b'"'] => Some(inner),
        _ => None,
    }
}

fn trim_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !is_whitespace(*b))
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !is_whitespace(*b))
        .map_or(start, |i| i + 1);
    bytes.get(start..end).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn kind_of(doc: &str) -> Result<ValueKind, ErrorKind> {
        Cursor::from_bytes(doc).what_is_next().map_err(|e| e.kind())
    }

    #[test]
    fn test_builtin_names() {
        for name in BUILTIN_TYPE_NAMES {
            assert!(builtin_kind(name).is_some(), "{name}");
        }
        assert_eq!(builtin_kind("string-my-01"), None);
    }

    #[test]
    fn test_read_type_declaration() {
        let mut cursor = Cursor::from_bytes(r#"  ( "point" ) {}"#);
        let annotation = cursor.read_type_declaration().unwrap();
        assert_eq!(annotation.name(), "point");
        assert_eq!(annotation.start().offset(), 2);
        assert_eq!(annotation.end().offset(), 13);
        assert!(!annotation.is_builtin());
        assert_eq!(cursor.next_significant_byte().unwrap(), b'{');
    }

    #[test]
    fn test_malformed_declarations() {
        for doc in [r#"(string) 1"#, r#"("string" 1"#, r#"("") 1"#, r#"( 1"#, r#"("x""#] {
            assert_eq!(
                kind_of(doc),
                Err(ErrorKind::MalformedTypeDeclaration),
                "{doc}"
            );
        }
        assert_eq!(
            kind_of(r#"("a") ("b") 1"#),
            Err(ErrorKind::MalformedTypeDeclaration)
        );
    }

    #[test]
    fn test_builtin_matches() {
        assert_eq!(kind_of(r#"("string") "x""#), Ok(ValueKind::String));
        assert_eq!(kind_of(r#"("integer") 2"#), Ok(ValueKind::Number));
        assert_eq!(kind_of(r#"("double") 2.5e3"#), Ok(ValueKind::Number));
        assert_eq!(kind_of(r#"("boolean") false"#), Ok(ValueKind::Boolean));
        assert_eq!(kind_of(r#"("null") null"#), Ok(ValueKind::Null));
        assert_eq!(kind_of(r#"("array") []"#), Ok(ValueKind::Array));
        assert_eq!(kind_of(r#"("object") {}"#), Ok(ValueKind::Object));
    }

    #[test]
    fn test_quoted_literals_are_coerced() {
        assert_eq!(kind_of(r#"("boolean") "true""#), Ok(ValueKind::Boolean));
        assert_eq!(kind_of(r#"("null") "null""#), Ok(ValueKind::Null));
        assert_eq!(kind_of(r#"("integer") "2""#), Ok(ValueKind::Number));
        assert_eq!(kind_of(r#"("decimal") "-0.5""#), Ok(ValueKind::Number));
    }

    #[test]
    fn test_mismatches() {
        assert_eq!(kind_of(r#"("integer") "two""#), Err(ErrorKind::TypeMismatch));
        assert_eq!(kind_of(r#"("boolean") "2""#), Err(ErrorKind::TypeMismatch));
        assert_eq!(kind_of(r#"("string") 1"#), Err(ErrorKind::TypeMismatch));
        assert_eq!(kind_of(r#"("array") {}"#), Err(ErrorKind::TypeMismatch));
        assert_eq!(kind_of(r#"("string") hello"#), Err(ErrorKind::TypeMismatch));
    }

    #[test]
    fn test_user_defined_kinds() {
        assert_eq!(kind_of(r#"("my-atomic") "v""#), Ok(ValueKind::UserDefinedAtomic));
        assert_eq!(kind_of(r#"("my-atomic") 5"#), Ok(ValueKind::UserDefinedAtomic));
        assert_eq!(kind_of(r#"("my-atomic") null"#), Ok(ValueKind::UserDefinedAtomic));
        assert_eq!(kind_of(r#"("my-list") [1]"#), Ok(ValueKind::UserDefinedArray));
        assert_eq!(kind_of(r#"("my-map") {}"#), Ok(ValueKind::UserDefinedObject));
        assert_eq!(kind_of(r#"("my-atomic") hello"#), Err(ErrorKind::UnexpectedToken));
    }

    #[test]
    fn test_cursor_left_on_value() {
        let mut cursor = Cursor::from_bytes(r#"("integer") "42" , 1"#);
        assert_eq!(cursor.what_is_next().unwrap(), ValueKind::Number);
        assert_eq!(cursor.position(), 12);
        assert_eq!(cursor.read_i32().unwrap(), 42);
    }

    #[test]
    fn test_recover_type_name() {
        let mut cursor = Cursor::from_bytes(r#"( "my-type" )  {"a": 1}"#);
        assert_eq!(cursor.what_is_next().unwrap(), ValueKind::UserDefinedObject);
        assert_eq!(cursor.recover_type_name().unwrap(), "my-type");
        assert_eq!(cursor.read_object().unwrap(), Some("a"));
    }

    #[test]
    fn test_recover_escaped_name() {
        let mut cursor = Cursor::from_bytes(r#"("a/(b\u0041") 1"#);
        assert_eq!(cursor.what_is_next().unwrap(), ValueKind::UserDefinedAtomic);
        assert_eq!(cursor.recover_type_name().unwrap(), "a/(bA");
    }

    #[test]
    fn test_recover_name_holding_parentheses() {
        for (doc, name) in [
            (r#"("f(x)") 1"#, "f(x)"),
            (r#"( "(" ) 1"#, "("),
            (r#"("a(\"b\")") [1]"#, "a(\"b\")"),
        ] {
            let mut cursor = Cursor::from_bytes(doc);
            let forward = cursor.read_type_declaration().unwrap().name().to_string();
            assert_eq!(forward, name);

            let mut cursor = Cursor::from_bytes(doc);
            assert!(cursor.what_is_next().unwrap().is_user_defined(), "{doc}");
            assert_eq!(cursor.recover_type_name().unwrap(), forward, "{doc}");
        }
    }

    #[test]
    fn test_recover_without_annotation() {
        let mut cursor = Cursor::from_bytes("  1");
        assert_eq!(cursor.what_is_next().unwrap(), ValueKind::Number);
        assert_eq!(
            cursor.recover_type_name().unwrap_err().kind(),
            ErrorKind::MalformedTypeDeclaration
        );
    }
}

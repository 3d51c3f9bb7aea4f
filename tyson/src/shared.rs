// SPDX-License-Identifier: Apache-2.0

/// Kind of the next value, as reported by [`Cursor::what_is_next`](crate::Cursor::what_is_next).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A quoted string (e.g., `"value"`).
    String,
    /// A number (e.g., `42` or `3.14`).
    Number,
    /// `null`
    Null,
    /// `true` or `false`
    Boolean,
    /// The start of an array (e.g., `[`).
    Array,
    /// The start of an object (e.g., `{`).
    Object,
    /// A string, number, boolean or null under a non-built-in annotation.
    UserDefinedAtomic,
    /// An array under a non-built-in annotation.
    UserDefinedArray,
    /// An object under a non-built-in annotation.
    UserDefinedObject,
    /// The next byte starts no known value.
    Invalid,
}

impl ValueKind {
    /// Classify a value by its leading byte.
    #[inline]
    pub fn of_byte(byte: u8) -> ValueKind {
        VALUE_KINDS[byte as usize]
    }

    /// True for the three user-defined kinds.
    pub fn is_user_defined(self) -> bool {
        matches!(
            self,
            ValueKind::UserDefinedAtomic | ValueKind::UserDefinedArray | ValueKind::UserDefinedObject
        )
    }
}

/// Informational refinement of [`ValueKind::Number`], derived from the lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberShade {
    /// No decimal point and no exponent.
    Integer,
    /// A decimal point but no exponent.
    Decimal,
    /// An exponent marker.
    Double,
}

const fn build_value_kinds() -> [ValueKind; 256] {
    let mut table = [ValueKind::Invalid; 256];
    table[b'"' as usize] = ValueKind::String;
    table[b'-' as usize] = ValueKind::Number;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = ValueKind::Number;
        digit += 1;
    }
    table[b't' as usize] = ValueKind::Boolean;
    table[b'f' as usize] = ValueKind::Boolean;
    table[b'n' as usize] = ValueKind::Null;
    table[b'[' as usize] = ValueKind::Array;
    table[b'{' as usize] = ValueKind::Object;
    table
}

const fn build_type_declaration_starts() -> [bool; 256] {
    let mut table = [false; 256];
    table[b'(' as usize] = true;
    table
}

/// Leading byte to value kind. `(` is deliberately `Invalid` here.
static VALUE_KINDS: [ValueKind; 256] = build_value_kinds();

/// Leading bytes that open a type declaration.
static TYPE_DECLARATION_STARTS: [bool; 256] = build_type_declaration_starts();

/// True if `byte` opens a type declaration.
#[inline]
pub fn is_type_declaration_start(byte: u8) -> bool {
    TYPE_DECLARATION_STARTS[byte as usize]
}

/// JSON insignificant whitespace
#[inline]
pub const fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes that end an unquoted literal
#[inline]
pub const fn is_literal_delimiter(byte: u8) -> bool {
    is_whitespace(byte)
        || matches!(
            byte,
            b',' | b':' | b'[' | b']' | b'{' | b'}' | b'(' | b')' | b'"'
        )
}

pub const fn from_utf8(v: &[u8]) -> Result<&str, crate::ErrorKind> {
    match core::str::from_utf8(v) {
        Ok(s) => Ok(s),
        Err(_) => Err(crate::ErrorKind::InvalidUtf8),
    }
}

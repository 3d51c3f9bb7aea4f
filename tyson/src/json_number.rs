// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use core::str::FromStr;

use crate::int_parser::{parse_i64, parse_narrow};
use crate::{ErrorKind, NumberShade};

/// The characters of the most recently read number.
///
/// The cursor owns one lexeme and refills it on every
/// [`read_number`](crate::Cursor::read_number), so reading numbers does not
/// allocate once the buffer has grown to the longest lexeme seen. Conversions
/// work on the buffered bytes and never touch the cursor again.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NumberLexeme {
    chars: Vec<u8>,
    dot_found: bool,
    exponent_found: bool,
}

impl NumberLexeme {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        self.chars.clear();
        self.dot_found = false;
        self.exponent_found = false;
    }

    /// Append one byte of a number, updating the shade flags.
    pub(crate) fn push(&mut self, byte: u8) {
        match byte {
            b'.' => self.dot_found = true,
            b'e' | b'E' => self.exponent_found = true,
            _ => {}
        }
        self.chars.push(byte);
    }

    /// Replace the contents with `bytes`, e.g. the content of a quoted number.
    pub(crate) fn set(&mut self, bytes: &[u8]) {
        self.clear();
        for &byte in bytes {
            self.push(byte);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.chars
    }

    /// Always available: the exact text of the number.
    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever pushed
        core::str::from_utf8(&self.chars).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// True if a decimal point was seen.
    pub fn dot_found(&self) -> bool {
        self.dot_found
    }

    /// Check if this number is an integer (no decimal point or exponent).
    pub fn is_integer(&self) -> bool {
        !self.dot_found && !self.exponent_found
    }

    pub fn shade(&self) -> NumberShade {
        if self.exponent_found {
            NumberShade::Double
        } else if self.dot_found {
            NumberShade::Decimal
        } else {
            NumberShade::Integer
        }
    }

    /// Check the lexeme against the JSON number grammar.
    pub fn is_valid(&self) -> bool {
        is_number_lexeme(&self.chars)
    }

    pub fn to_i16(&self) -> Result<i16, ErrorKind> {
        parse_narrow(self.integer_bytes()?)
    }

    pub fn to_i32(&self) -> Result<i32, ErrorKind> {
        parse_narrow(self.integer_bytes()?)
    }

    pub fn to_i64(&self) -> Result<i64, ErrorKind> {
        parse_i64(self.integer_bytes()?)
    }

    pub fn to_f64(&self) -> Result<f64, ErrorKind> {
        self.parse::<f64>().map_err(|_| ErrorKind::InvalidNumber)
    }

    pub fn to_f32(&self) -> Result<f32, ErrorKind> {
        self.parse::<f32>().map_err(|_| ErrorKind::InvalidNumber)
    }

    /// Parse the number as a custom type using the exact string representation.
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        T::from_str(self.as_str())
    }

    fn integer_bytes(&self) -> Result<&[u8], ErrorKind> {
        if !self.is_integer() {
            return Err(ErrorKind::InvalidNumber);
        }
        Ok(&self.chars)
    }
}

impl AsRef<str> for NumberLexeme {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl core::fmt::Display for NumberLexeme {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bytes that may appear inside a number lexeme
#[inline]
pub const fn is_number_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
}

/// `-?digits(.digits)?([eE][+-]?digits)?`
///
/// Leading zeros are tolerated.
pub fn is_number_lexeme(bytes: &[u8]) -> bool {
    fn digits(bytes: &[u8]) -> (usize, &[u8]) {
        let count = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
        (count, bytes.get(count..).unwrap_or_default())
    }

    let rest = bytes.strip_prefix(b"-").unwrap_or(bytes);
    let (count, mut rest) = digits(rest);
    if count == 0 {
        return false;
    }
    if let Some(fraction) = rest.strip_prefix(b".") {
        let (count, tail) = digits(fraction);
        if count == 0 {
            return false;
        }
        rest = tail;
    }
    if let Some((&marker, exponent)) = rest.split_first() {
        if marker != b'e' && marker != b'E' {
            return false;
        }
        let exponent = match exponent.split_first() {
            Some((b'+' | b'-', tail)) => tail,
            _ => exponent,
        };
        let (count, tail) = digits(exponent);
        return count > 0 && tail.is_empty();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexeme(text: &str) -> NumberLexeme {
        let mut lexeme = NumberLexeme::new();
        lexeme.set(text.as_bytes());
        lexeme
    }

    #[test]
    fn test_shades() {
        assert_eq!(lexeme("42").shade(), NumberShade::Integer);
        assert_eq!(lexeme("-4.2").shade(), NumberShade::Decimal);
        assert_eq!(lexeme("4.2e10").shade(), NumberShade::Double);
        assert_eq!(lexeme("1E-3").shade(), NumberShade::Double);
        assert!(lexeme("-4.2").dot_found());
        assert!(!lexeme("1E-3").dot_found());
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(lexeme("2").to_i32(), Ok(2));
        assert_eq!(lexeme("-32768").to_i16(), Ok(i16::MIN));
        assert_eq!(lexeme("32768").to_i16(), Err(ErrorKind::Overflow));
        assert_eq!(lexeme("9007199254740993").to_i64(), Ok(9_007_199_254_740_993));
        assert_eq!(lexeme("2.5").to_i32(), Err(ErrorKind::InvalidNumber));
        assert_eq!(lexeme("1e3").to_i64(), Err(ErrorKind::InvalidNumber));
    }

    #[test]
    fn test_float_conversions() {
        assert_eq!(lexeme("2.5").to_f64(), Ok(2.5));
        assert_eq!(lexeme("-1e3").to_f64(), Ok(-1000.0));
        assert_eq!(lexeme("7").to_f32(), Ok(7.0));
    }

    #[test]
    fn test_grammar() {
        for valid in ["0", "-0", "12", "1.5", "-1.5e10", "1E+2", "007"] {
            assert!(is_number_lexeme(valid.as_bytes()), "{valid}");
        }
        for invalid in ["", "-", "1.", ".5", "1e", "1e+", "--1", "1-2", "+1", "1.2.3", "1ee2"] {
            assert!(!is_number_lexeme(invalid.as_bytes()), "{invalid}");
        }
    }

    #[test]
    fn test_display_and_parse() {
        let number = lexeme("123");
        assert_eq!(number.to_string(), "123");
        assert_eq!(number.parse::<u8>(), Ok(123));
        assert_eq!(number.as_ref(), "123");
    }
}

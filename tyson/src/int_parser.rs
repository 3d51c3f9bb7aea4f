// SPDX-License-Identifier: Apache-2.0

// Checked base-10 conversion of integer lexemes. Narrow widths go through i64
// so there is a single accumulation loop.

use crate::ErrorKind;

/// Parse `-?[0-9]+` into an `i64`.
///
/// Digits are accumulated as a negative value, which has the larger range,
/// so `i64::MIN` parses without a special case.
pub fn parse_i64(lexeme: &[u8]) -> Result<i64, ErrorKind> {
    let (negative, digits) = match lexeme {
        [b'-', rest @ ..] => (true, rest),
        _ => (false, lexeme),
    };
    if digits.is_empty() {
        return Err(ErrorKind::InvalidNumber);
    }

    let mut value: i64 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(ErrorKind::InvalidNumber);
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_sub(i64::from(byte - b'0')))
            .ok_or(ErrorKind::Overflow)?;
    }

    if negative {
        Ok(value)
    } else {
        value.checked_neg().ok_or(ErrorKind::Overflow)
    }
}

/// Parse an integer lexeme into a narrower type, failing with `Overflow`
/// when it does not fit.
pub fn parse_narrow<T: TryFrom<i64>>(lexeme: &[u8]) -> Result<T, ErrorKind> {
    T::try_from(parse_i64(lexeme)?).map_err(|_| ErrorKind::Overflow)
}

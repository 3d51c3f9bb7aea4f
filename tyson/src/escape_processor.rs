// SPDX-License-Identifier: Apache-2.0

// Escape decoding shared by the streaming string reader and by type-name
// recovery, which decodes a name it finds already sitting in the window.

use alloc::vec::Vec;

use crate::ErrorKind;

const HIGH_SURROGATES: core::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: core::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Decoder state carried across the escapes of one string.
///
/// A `\u` escape naming a high surrogate emits nothing; the next escape must
/// be its low half. Anything else in between is `InvalidUnicodeCodepoint`.
#[derive(Debug, Default)]
pub struct Unescaper {
    high_surrogate: Option<u32>,
}

impl Unescaper {
    /// Decode the single-character escape after a backslash.
    pub fn simple(&self, escape: u8) -> Result<u8, ErrorKind> {
        self.no_pending_surrogate()?;
        Ok(match escape {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0C,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            _ => return Err(ErrorKind::InvalidEscapeSequence),
        })
    }

    /// Decode the four hex digits of a `\uXXXX` escape, appending UTF-8 to `out`.
    pub fn unicode(&mut self, hex: &[u8], out: &mut Vec<u8>) -> Result<(), ErrorKind> {
        let unit = code_unit(hex)?;
        let scalar = match (self.high_surrogate.take(), unit) {
            (Some(high), low) if LOW_SURROGATES.contains(&low) => {
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            (Some(_), _) => return Err(ErrorKind::InvalidUnicodeCodepoint),
            (None, high) if HIGH_SURROGATES.contains(&high) => {
                self.high_surrogate = Some(high);
                return Ok(());
            }
            (None, other) => other,
        };
        let ch = char::from_u32(scalar).ok_or(ErrorKind::InvalidUnicodeCodepoint)?;
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    /// Fails if a high surrogate is still waiting for its low half.
    pub fn no_pending_surrogate(&self) -> Result<(), ErrorKind> {
        match self.high_surrogate {
            Some(_) => Err(ErrorKind::InvalidUnicodeCodepoint),
            None => Ok(()),
        }
    }
}

fn code_unit(hex: &[u8]) -> Result<u32, ErrorKind> {
    if hex.len() != 4 {
        return Err(ErrorKind::InvalidUnicodeHex);
    }
    hex.iter().try_fold(0u32, |unit, &byte| {
        let digit = char::from(byte)
            .to_digit(16)
            .ok_or(ErrorKind::InvalidUnicodeHex)?;
        Ok((unit << 4) | digit)
    })
}

/// Decode a complete escaped string body, quotes excluded, into `out`.
pub fn unescape_into(src: &[u8], out: &mut Vec<u8>) -> Result<(), ErrorKind> {
    let mut unescaper = Unescaper::default();
    let mut rest = src;
    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            unescaper.no_pending_surrogate()?;
            out.push(byte);
            continue;
        }
        let (&escape, tail) = rest
            .split_first()
            .ok_or(ErrorKind::InvalidEscapeSequence)?;
        rest = tail;
        if escape == b'u' {
            let hex = rest.get(..4).ok_or(ErrorKind::InvalidUnicodeHex)?;
            rest = rest.get(4..).unwrap_or_default();
            unescaper.unicode(hex, out)?;
        } else {
            out.push(unescaper.simple(escape)?);
        }
    }
    unescaper.no_pending_surrogate()
}

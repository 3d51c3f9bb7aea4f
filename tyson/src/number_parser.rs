// SPDX-License-Identifier: Apache-2.0

use crate::json_number::is_number_byte;
use crate::{Cursor, ErrorKind, NumberLexeme, ParseError, Reader};

impl<R: Reader> Cursor<R> {
    /// Read a number lexeme.
    ///
    /// Digits, sign, decimal point and exponent characters are collected
    /// (refilling the window as needed) until a delimiter, then the lexeme is
    /// checked against the number grammar. A number written as a quoted
    /// string, e.g. `"2"` after an `("integer")` annotation, is accepted too.
    pub fn read_number(&mut self) -> Result<&NumberLexeme, ParseError> {
        const OP: &str = "read_number";
        if self.next_token(OP)? == b'"' {
            self.scratch.clear();
            self.read_string_body(OP)?;
            self.number.set(&self.scratch);
        } else {
            self.unread_byte()?;
            self.number.clear();
            while let Some(byte) = self.next_byte_opt()? {
                if !is_number_byte(byte) {
                    self.unread_byte()?;
                    break;
                }
                self.number.push(byte);
            }
        }
        if !self.number.is_valid() {
            return Err(self.report_error(OP, ErrorKind::InvalidNumber));
        }
        Ok(&self.number)
    }

    /// Read a number and return its exact text.
    pub fn read_number_str(&mut self) -> Result<&str, ParseError> {
        self.read_number()?;
        Ok(self.number.as_str())
    }

    pub fn read_i16(&mut self) -> Result<i16, ParseError> {
        self.read_number()?;
        self.number
            .to_i16()
            .map_err(|kind| self.report_error("read_i16", kind))
    }

    pub fn read_i32(&mut self) -> Result<i32, ParseError> {
        self.read_number()?;
        self.number
            .to_i32()
            .map_err(|kind| self.report_error("read_i32", kind))
    }

    pub fn read_i64(&mut self) -> Result<i64, ParseError> {
        self.read_number()?;
        self.number
            .to_i64()
            .map_err(|kind| self.report_error("read_i64", kind))
    }

    pub fn read_f32(&mut self) -> Result<f32, ParseError> {
        self.read_number()?;
        self.number
            .to_f32()
            .map_err(|kind| self.report_error("read_f32", kind))
    }

    pub fn read_f64(&mut self) -> Result<f64, ParseError> {
        self.read_number()?;
        self.number
            .to_f64()
            .map_err(|kind| self.report_error("read_f64", kind))
    }
}

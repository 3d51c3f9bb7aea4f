// SPDX-License-Identifier: Apache-2.0

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::{Cursor, ErrorKind, ParseError, Reader, ValueKind};

/// An owned TySON value.
///
/// Objects keep their fields in input order, duplicates included.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// A number without fraction or exponent that fits an `i64`.
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
    /// A value under a non-built-in type annotation.
    UserDefined {
        type_name: String,
        value: Box<Value>,
    },
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// First field called `key`, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    /// The annotation name of a user-defined value.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::UserDefined { type_name, .. } => Some(type_name),
            _ => None,
        }
    }

    /// The value with any user-defined wrapper removed.
    pub fn untyped(&self) -> &Value {
        match self {
            Value::UserDefined { value, .. } => value.untyped(),
            other => other,
        }
    }
}

impl<R: Reader> Cursor<R> {
    /// Read the next value into an owned [`Value`].
    ///
    /// Built-in annotations are checked and dropped; user-defined ones become
    /// [`Value::UserDefined`]. A bare word reads as a string.
    ///
    /// Without an annotation a quoted `"true"`, `"false"` or `"null"` stays a
    /// [`Value::String`]. Only `("boolean")` or `("null")` in front of it
    /// turns it into a boolean or null.
    pub fn read_value(&mut self) -> Result<Value, ParseError> {
        const OP: &str = "read_value";
        let (kind, user_type) = self.what_is_next_named()?;
        match kind {
            ValueKind::String => Ok(Value::String(String::from(self.read_string()?))),
            ValueKind::Number => {
                self.read_number()?;
                if self.number.is_integer() {
                    match self.number.to_i64() {
                        Ok(int) => return Ok(Value::Int(int)),
                        Err(ErrorKind::Overflow) => {}
                        Err(kind) => return Err(self.report_error(OP, kind)),
                    }
                }
                self.number
                    .to_f64()
                    .map(Value::Float)
                    .map_err(|kind| self.report_error(OP, kind))
            }
            ValueKind::Boolean => Ok(Value::Bool(self.read_boolean()?)),
            ValueKind::Null => {
                if self.read_null()? {
                    Ok(Value::Null)
                } else {
                    Err(self.report_error(OP, ErrorKind::UnexpectedToken))
                }
            }
            ValueKind::Array => {
                self.enter(OP)?;
                let result = self.read_array_items();
                self.leave();
                result.map(Value::Array)
            }
            ValueKind::Object => {
                self.enter(OP)?;
                let result = self.read_object_fields();
                self.leave();
                result.map(Value::Object)
            }
            ValueKind::UserDefinedAtomic
            | ValueKind::UserDefinedArray
            | ValueKind::UserDefinedObject => {
                let type_name = match user_type {
                    Some(name) => name,
                    None => self.recover_type_name()?,
                };
                let value = self.read_value()?;
                Ok(Value::UserDefined {
                    type_name,
                    value: Box::new(value),
                })
            }
            ValueKind::Invalid => Ok(Value::String(String::from(self.read_unquoted_literal()?))),
        }
    }

    fn read_array_items(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut items = Vec::new();
        while self.read_array()? {
            items.push(self.read_value()?);
        }
        Ok(items)
    }

    fn read_object_fields(&mut self) -> Result<Vec<(String, Value)>, ParseError> {
        let mut fields = Vec::new();
        while let Some(name) = self.read_object()? {
            let name = String::from(name);
            let value = self.read_value()?;
            fields.push((name, value));
        }
        Ok(fields)
    }
}

/// Parse a complete document held in memory.
///
/// Anything but whitespace after the value is an error.
///
/// ```
/// use tyson::Value;
///
/// let value = tyson::from_str(r#"("point") {"x": 1, "y": ("integer") "2"}"#).unwrap();
/// assert_eq!(value.type_name(), Some("point"));
/// assert_eq!(value.untyped().get("y"), Some(&Value::Int(2)));
/// ```
pub fn from_slice(bytes: &[u8]) -> Result<Value, ParseError> {
    let mut cursor = Cursor::from_bytes(bytes);
    let value = cursor.read_value()?;
    cursor.expect_end()?;
    Ok(value)
}

pub fn from_str(text: &str) -> Result<Value, ParseError> {
    from_slice(text.as_bytes())
}

/// Parse a complete document from a streaming source.
pub fn from_reader<R: Reader>(reader: R) -> Result<Value, ParseError> {
    let mut cursor = Cursor::from_reader(reader);
    let value = cursor.read_value()?;
    cursor.expect_end()?;
    Ok(value)
}

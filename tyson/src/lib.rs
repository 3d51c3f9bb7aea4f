// SPDX-License-Identifier: Apache-2.0

//! A streaming cursor for TySON: JSON where any value may carry a
//! parenthesized, quoted type annotation, e.g. `("integer") 2` or
//! `("my-array") ["hello"]`.
//!
//! The [`Cursor`] reads values in place from a byte window that is either a
//! complete document or refilled from a [`Reader`]. Ask
//! [`what_is_next`](Cursor::what_is_next) for the kind of the next value, then
//! call the matching reader:
//!
//! ```
//! use tyson::{Cursor, ValueKind};
//!
//! let mut cursor = Cursor::from_bytes(r#"("my-array") ["hello"]"#);
//! assert_eq!(cursor.what_is_next().unwrap(), ValueKind::UserDefinedArray);
//! assert_eq!(cursor.recover_type_name().unwrap(), "my-array");
//! assert!(cursor.read_array().unwrap());
//! assert_eq!(cursor.read_string().unwrap(), "hello");
//! assert!(!cursor.read_array().unwrap());
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod config;
pub use config::{CursorConfig, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_DEPTH};

mod cursor;
pub use cursor::{Cursor, Mark};

mod stream_buffer;

mod reader;
#[cfg(feature = "std")]
pub use reader::IoReader;
pub use reader::{NoSource, Reader};

mod chunk_reader;
pub use chunk_reader::ChunkReader;

mod shared;
pub use shared::{NumberShade, ValueKind};

mod parse_error;
pub use parse_error::{ErrorKind, ParseError, UnexpectedState, PEEK_LEN};

mod escape_processor;

mod int_parser;

mod json_number;
pub use json_number::NumberLexeme;

mod number_parser;

mod string_reader;

mod literal_reader;

mod structure;
pub use structure::RawValue;

mod type_declaration;
pub use type_declaration::{builtin_kind, TypeAnnotation, BUILTIN_TYPE_NAMES};

mod value;
pub use value::{from_reader, from_slice, from_str, Value};

#[cfg(feature = "std")]
mod pool;
#[cfg(feature = "std")]
pub use pool::{CursorPool, PooledCursor};

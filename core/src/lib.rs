#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod io;
mod string;
mod number;
mod value;
mod reader;
mod writer;

pub use value::Value;
pub use reader::{DEFAULT_MAX_DEPTH, Reader};
pub use writer::{FlattenToken, Writer};

/// An error incurred when reading or writing JSON.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum JsonError {
  /// The JSON ended before the current item was complete.
  #[error("the JSON ended unexpectedly at byte {0}")]
  UnexpectedEnd(usize),
  /// The JSON had an invalid key.
  #[error("invalid key at byte {0}")]
  InvalidKey(usize),
  /// The JSON had an invalid delimiter between the key and value (`:` expected).
  #[error("expected `:` after the key at byte {0}")]
  InvalidKeyValueDelimiter(usize),
  /// The JSON had an invalid value.
  #[error("invalid value at byte {0}")]
  InvalidValue(usize),
  /// The JSON had a trailing comma.
  #[error("trailing comma at byte {0}")]
  TrailingComma(usize),
  /// The JSON had mismatched delimiters between the open and close of the structure.
  #[error("mismatched delimiter at byte {0}")]
  MismatchedDelimiter(usize),
  /// There were bytes other than whitespace after the document.
  #[error("the JSON document was not fully consumed, trailing bytes at byte {0}")]
  TrailingBytes(usize),
  /// The value was of a different type than requested.
  #[error("expected {expected} but found {found}")]
  TypeError {
    /// The type requested.
    expected: Type,
    /// The type present.
    found: Type,
  },
  /// The number could not be represented by the requested numeric type.
  #[error("the number at byte {0} is out of range for the requested type")]
  NumberOutOfRange(usize),
  /// A number which isn't finite was written.
  #[error("JSON cannot represent a non-finite number")]
  NonFinite,
  /// The structure was nested deeper than allowed.
  #[error("the JSON was nested deeper than {0} levels")]
  StackTooDeep(usize),
  /// A name was skipped while unknown names were disallowed.
  #[error("cannot skip the unexpected name at byte {0}")]
  UnknownName(usize),
  /// A value was skipped while unknown values were disallowed.
  #[error("cannot skip the unexpected value at byte {0}")]
  UnknownValue(usize),
  /// An operation was called in a state it isn't valid in.
  #[error("invalid state: {0}")]
  InvalidState(&'static str),
}

/// The type of the value.
///
/// https://datatracker.ietf.org/doc/html/rfc8259#section-3 defines all possible values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Type {
  /// An object.
  Object,
  /// An array.
  Array,
  /// A string.
  String,
  /// A RFC-8259 number.
  Number,
  /// A boolean.
  Bool,
  /// The `null` unit value.
  Null,
}

impl core::fmt::Display for Type {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(match self {
      Type::Object => "object",
      Type::Array => "array",
      Type::String => "string",
      Type::Number => "number",
      Type::Bool => "boolean",
      Type::Null => "null",
    })
  }
}

/// Get the type of the item starting with this byte.
///
/// This does not assert it's a valid instance of this class of items. It solely asserts if this
/// is a valid item, it will be of this type.
#[inline(always)]
pub(crate) fn kind(first: u8) -> Type {
  match first {
    b'{' => Type::Object,
    b'[' => Type::Array,
    b'"' => Type::String,
    b't' | b'f' => Type::Bool,
    b'n' => Type::Null,
    _ => Type::Number,
  }
}

#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;
use alloc::{boxed::Box, string::String};

pub use tagged_json::*;

mod primitives;
mod float;
mod string;
mod option;
mod boxed;
mod sequences;
mod maps;
mod codec;
pub use codec::*;

/// An error boxed for transport through [`Error`].
pub type BoxedError = Box<dyn core::error::Error + Send + Sync>;

/// An error when decoding or encoding a value.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// An error from the underlying reader or writer.
  #[error(transparent)]
  Json(#[from] JsonError),
  /// An error from a codec when decoding.
  ///
  /// The original error may be recovered with `downcast_ref`.
  #[error(transparent)]
  Decode(BoxedError),
  /// An error from a codec when encoding.
  ///
  /// The original error may be recovered with `downcast_ref`.
  #[error(transparent)]
  Encode(BoxedError),
  /// An error from a factory when creating a codec.
  ///
  /// The original error may be recovered with `downcast_ref`.
  #[error(transparent)]
  Factory(BoxedError),
  /// No codec was available for the requested type.
  #[error("no codec is available for {type_name}")]
  MissingCodec {
    /// The name of the requested type.
    type_name: &'static str,
  },
  /// A codec was asked to encode a value of a type other than the one it was created for.
  #[error("expected a value of type {expected} but found one of type {found}")]
  UnexpectedSubtype {
    /// The name of the type the codec encodes.
    expected: &'static str,
    /// The name of the value's type.
    found: &'static str,
  },
}

/// An item which can be deserialized from a JSON reader.
///
/// This will deserialize the value present without limitation, besides the reader's own bound on
/// depth. This should be kept in mind when deserializing into types which allocate.
pub trait JsonDeserialize: Sized {
  /// Decode this item from the next value within the reader.
  ///
  /// Exactly one value should be consumed.
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error>;
}

/// An item which can be serialized to a JSON writer.
pub trait JsonSerialize {
  /// Write this item as the next value within the writer.
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error>;
}

/// Deserialize an item from a JSON document.
///
/// The entire document must be consumed by the item.
pub fn from_slice<T: JsonDeserialize>(json: &[u8]) -> Result<T, Error> {
  let mut reader = Reader::new(json);
  let result = T::deserialize(&mut reader)?;
  reader.finish()?;
  Ok(result)
}

/// Serialize an item as a JSON document.
pub fn to_string<T: ?Sized + JsonSerialize>(value: &T) -> Result<String, Error> {
  let mut writer = Writer::new();
  value.serialize(&mut writer)?;
  Ok(writer.finish()?)
}

impl JsonDeserialize for Value {
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    Ok(reader.read_value()?)
  }
}
impl JsonSerialize for Value {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    Ok(writer.json_value(self)?)
  }
}

impl JsonDeserialize for () {
  /// This will accept `null` as a representation of `()`.
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    Ok(reader.next_null()?)
  }
}
impl JsonSerialize for () {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    Ok(writer.null()?)
  }
}

#[test]
fn documents() {
  assert_eq!(from_slice::<Value>(b" [1, {\"a\": null}] ").unwrap().to_string(), "[1,{\"a\":null}]");
  assert!(matches!(from_slice::<bool>(b"true false"), Err(Error::Json(JsonError::TrailingBytes(5)))));
  assert_eq!(to_string(&Value::Null).unwrap(), "null");
  assert!(matches!(to_string(&f64::NAN), Err(Error::Json(JsonError::NonFinite))));
}

use core::fmt;
use alloc::{format, string::{String, ToString}, vec::Vec, sync::Arc};

use log::{trace, debug};

use tagged_json_traits::{Type, Reader, Writer, Error, Polymorphic, TypeKey, Codec};

use crate::{Label, DecodeError, EncodeError};

/// Join items as a comma-separated list.
pub(crate) fn join(items: impl Iterator<Item: fmt::Display>) -> String {
  let mut result = String::new();
  for (i, item) in items.enumerate() {
    if i != 0 {
      result.push_str(", ");
    }
    result.push_str(&item.to_string());
  }
  result
}

/// A codec for a polymorphic family, resolved from a [`crate::SubtypeRegistry`].
///
/// Values are represented as JSON objects with the label under the label key, alongside the
/// subtype's own fields:
///
/// ```json
/// {"type": "circle", "radius": 1.5}
/// ```
///
/// The codec holds the codec for each subtype and may be reused for any amount of documents.
pub struct PolymorphicCodec<T, V> {
  label_key: String,
  labels: Vec<V>,
  subtypes: Vec<TypeKey>,
  codecs: Vec<Arc<dyn Codec<T>>>,
  fallback: Option<Arc<dyn Codec<T>>>,
}

impl<T, V> fmt::Display for PolymorphicCodec<T, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "PolymorphicCodec({})", self.label_key)
  }
}

impl<T, V: fmt::Debug> fmt::Debug for PolymorphicCodec<T, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PolymorphicCodec")
      .field("label_key", &self.label_key)
      .field("labels", &self.labels)
      .field("subtypes", &self.subtypes.iter().map(TypeKey::name).collect::<Vec<_>>())
      .field("fallback", &self.fallback.is_some())
      .finish_non_exhaustive()
  }
}

impl<T: Polymorphic, V: Label> PolymorphicCodec<T, V> {
  pub(crate) fn new(
    label_key: String,
    labels: Vec<V>,
    subtypes: Vec<TypeKey>,
    codecs: Vec<Arc<dyn Codec<T>>>,
    fallback: Option<Arc<dyn Codec<T>>>,
  ) -> Self {
    PolymorphicCodec { label_key, labels, subtypes, codecs, fallback }
  }

  /// The key of the field holding the label.
  pub fn label_key(&self) -> &str {
    &self.label_key
  }

  /// Select the codec for the object the reader is positioned at, by its label.
  ///
  /// This consumes from the reader, which should be a lookahead.
  fn select(&self, reader: &mut Reader<'_>) -> Result<&Arc<dyn Codec<T>>, DecodeError> {
    reader.begin_object()?;
    while reader.has_next()? {
      if reader.select_name(&[self.label_key.as_str()])?.is_none() {
        reader.skip_name()?;
        reader.skip_value()?;
        continue;
      }

      let value = reader.read_value()?;
      if value.is_null() {
        Err(DecodeError::NullLabel { key: self.label_key.clone() })?;
      }
      let Some(label) = V::from_json(&value) else {
        Err(DecodeError::LabelType {
          key: self.label_key.clone(),
          expected: V::KIND,
          found: value.kind(),
        })?
      };

      return match (self.labels.iter().position(|candidate| *candidate == label), &self.fallback) {
        (Some(i), _) => {
          trace!("{self} selected {} for the label {label}", self.subtypes[i]);
          Ok(&self.codecs[i])
        }
        (None, Some(fallback)) => {
          debug!("{self} found the unregistered label {label}, using the fallback");
          Ok(fallback)
        }
        (None, None) => Err(DecodeError::UnknownLabel {
          key: self.label_key.clone(),
          expected: join(self.labels.iter()),
          found: label.to_string(),
        }),
      };
    }
    Err(DecodeError::MissingLabel { key: self.label_key.clone() })
  }

  /// Decode a value from the object the reader is positioned at.
  ///
  /// The label is found with a lookahead, leaving the reader positioned at the object when
  /// resolving the label fails. The object, including its label, is then decoded by the codec for
  /// the subtype (or the fallback).
  pub fn decode(&self, reader: &mut Reader<'_>) -> Result<T, DecodeError> {
    let codec = {
      let mut peeked = reader.peek_json();
      peeked.set_fail_on_unknown(false);
      self.select(&mut peeked)?
    };
    Ok(codec.decode(reader)?)
  }

  /// Decode a value which may be `null`.
  ///
  /// `null` is decoded as `None` without consulting the labels.
  pub fn decode_nullable(&self, reader: &mut Reader<'_>) -> Result<Option<T>, DecodeError> {
    if reader.peek()? == Type::Null {
      reader.next_null()?;
      return Ok(None);
    }
    self.decode(reader).map(Some)
  }

  /// Encode a value as an object with its label and fields.
  ///
  /// The label is written first. Values of types which weren't registered are encoded by the
  /// fallback, without a label.
  pub fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), EncodeError> {
    let concrete = value.as_any().type_id();
    let (codec, label) = match self.subtypes.iter().position(|subtype| subtype.id() == concrete) {
      Some(i) => (&self.codecs[i], Some(&self.labels[i])),
      None => {
        let Some(fallback) = &self.fallback else {
          Err(EncodeError::UnregisteredSubtype {
            expected: join(self.subtypes.iter().map(TypeKey::name)),
            value: format!("{value:?}"),
            type_name: value.type_name(),
          })?
        };
        debug!("{self} encoding the unregistered {} with the fallback", value.type_name());
        (fallback, None)
      }
    };

    writer.begin_object()?;
    if let Some(label) = label {
      writer.name(&self.label_key)?;
      label.serialize(writer)?;
    }
    let token = writer.begin_flatten()?;
    codec.encode(value, writer)?;
    writer.end_flatten(token)?;
    writer.end_object()?;
    Ok(())
  }

  /// Encode a value which may be `None`, as `null`.
  pub fn encode_nullable(&self, value: Option<&T>, writer: &mut Writer) -> Result<(), EncodeError> {
    match value {
      Some(value) => self.encode(value, writer),
      None => Ok(writer.null()?),
    }
  }
}

impl<T: Polymorphic, V: Label> Codec<T> for PolymorphicCodec<T, V> {
  fn decode(&self, reader: &mut Reader<'_>) -> Result<T, Error> {
    Ok(PolymorphicCodec::decode(self, reader)?)
  }
  fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
    Ok(PolymorphicCodec::encode(self, value, writer)?)
  }
}

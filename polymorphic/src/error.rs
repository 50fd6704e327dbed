use alloc::{boxed::Box, string::String};

use tagged_json_traits::{Type, JsonError, Error};

use crate::LabelKind;

/// An error when configuring a registry or resolving it into a codec.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
  /// The label key was empty.
  #[error("the label key must not be empty")]
  EmptyLabelKey,
  /// The label was already registered.
  #[error("labels must be unique, yet '{label}' was already registered")]
  DuplicateLabel {
    /// The duplicated label.
    label: String,
  },
  /// The label isn't usable, such as a non-finite float.
  #[error("'{label}' isn't a valid label")]
  InvalidLabel {
    /// The invalid label.
    label: String,
  },
  /// No codec was available for a registered subtype.
  #[error("no codec is available for the subtype {subtype}")]
  MissingCodec {
    /// The name of the subtype.
    subtype: &'static str,
  },
  /// The codec for a registered subtype couldn't be created.
  #[error("the codec for the subtype {subtype} couldn't be created: {error}")]
  Subtype {
    /// The name of the subtype.
    subtype: &'static str,
    /// The error from creating the codec.
    #[source]
    error: Error,
  },
}

/// An error when decoding a polymorphic value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
  /// The object didn't have a label.
  #[error("missing label for {key}")]
  MissingLabel {
    /// The label key.
    key: String,
  },
  /// The label was `null`.
  #[error("label key '{key}' value is null")]
  NullLabel {
    /// The label key.
    key: String,
  },
  /// The label was a different type than the registry's labels.
  #[error(
    "expected label's type is '{expected}' but found '{found}' for key '{key}'. Register a \
     subtype for this label."
  )]
  LabelType {
    /// The label key.
    key: String,
    /// The kind of the registry's labels.
    expected: LabelKind,
    /// The JSON type found.
    found: Type,
  },
  /// The label wasn't registered and there was no fallback.
  #[error(
    "expected one of [{expected}] for key '{key}' but found '{found}'. Register a subtype for \
     this label."
  )]
  UnknownLabel {
    /// The label key.
    key: String,
    /// The registered labels.
    expected: String,
    /// The label found.
    found: String,
  },
  /// An error from the reader.
  #[error(transparent)]
  Json(#[from] JsonError),
  /// An error from the subtype's (or fallback's) codec.
  #[error(transparent)]
  Subtype(Error),
}

/// An error when encoding a polymorphic value.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
  /// The value's type wasn't registered and there was no fallback.
  #[error("expected one of [{expected}] but found {value}, a {type_name}. Register this subtype.")]
  UnregisteredSubtype {
    /// The registered subtypes.
    expected: String,
    /// The value, formatted with `Debug`.
    value: String,
    /// The name of the value's type.
    type_name: &'static str,
  },
  /// An error from the writer.
  #[error(transparent)]
  Json(#[from] JsonError),
  /// An error from the subtype's (or fallback's) codec.
  #[error(transparent)]
  Subtype(Error),
}

impl From<Error> for DecodeError {
  /// Errors from nested polymorphic codecs are unwrapped.
  fn from(error: Error) -> DecodeError {
    match error {
      Error::Json(error) => DecodeError::Json(error),
      Error::Decode(error) => match error.downcast::<DecodeError>() {
        Ok(error) => *error,
        Err(error) => DecodeError::Subtype(Error::Decode(error)),
      },
      error => DecodeError::Subtype(error),
    }
  }
}

impl From<DecodeError> for Error {
  fn from(error: DecodeError) -> Error {
    match error {
      DecodeError::Json(error) => Error::Json(error),
      DecodeError::Subtype(error) => error,
      error => Error::Decode(Box::new(error)),
    }
  }
}

impl From<Error> for EncodeError {
  /// Errors from nested polymorphic codecs are unwrapped.
  fn from(error: Error) -> EncodeError {
    match error {
      Error::Json(error) => EncodeError::Json(error),
      Error::Encode(error) => match error.downcast::<EncodeError>() {
        Ok(error) => *error,
        Err(error) => EncodeError::Subtype(Error::Encode(error)),
      },
      error => EncodeError::Subtype(error),
    }
  }
}

impl From<EncodeError> for Error {
  fn from(error: EncodeError) -> Error {
    match error {
      EncodeError::Json(error) => Error::Json(error),
      EncodeError::Subtype(error) => error,
      error => Error::Encode(Box::new(error)),
    }
  }
}

impl From<ConfigurationError> for Error {
  fn from(error: ConfigurationError) -> Error {
    Error::Factory(Box::new(error))
  }
}

#[test]
fn conversions() {
  let error = DecodeError::MissingLabel { key: "type".into() };
  assert_eq!(error.to_string(), "missing label for type");
  let error = Error::from(error);
  assert!(matches!(&error, Error::Decode(inner) if inner.is::<DecodeError>()));
  assert!(matches!(DecodeError::from(error), DecodeError::MissingLabel { key } if key == "type"));

  let error = Error::from(DecodeError::Json(JsonError::NonFinite));
  assert!(matches!(error, Error::Json(JsonError::NonFinite)));

  let error = EncodeError::from(Error::MissingCodec { type_name: "u8" });
  assert!(matches!(error, EncodeError::Subtype(Error::MissingCodec { type_name: "u8" })));
  assert!(matches!(Error::from(error), Error::MissingCodec { type_name: "u8" }));
}

use core::fmt;
use alloc::string::String;

use tagged_json_traits::{Value, JsonSerialize};

/// The kind of scalar a registry's labels are.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LabelKind {
  /// A string.
  String,
  /// A boolean.
  Boolean,
  /// A 16-bit signed integer.
  Short,
  /// A 32-bit signed integer.
  Int,
  /// A 64-bit signed integer.
  Long,
  /// A 32-bit float.
  Float,
  /// A 64-bit float.
  Double,
}

impl fmt::Display for LabelKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      LabelKind::String => "string",
      LabelKind::Boolean => "bool",
      LabelKind::Short => "i16",
      LabelKind::Int => "i32",
      LabelKind::Long => "i64",
      LabelKind::Float => "f32",
      LabelKind::Double => "f64",
    })
  }
}

/// A value which may identify a subtype.
///
/// Labels are written with their native JSON representation. When read, JSON numbers are
/// coerced to the label's numeric kind with `as` semantics, so `2.0` (or `2.5`) is read as the
/// `i32` label `2`.
pub trait Label:
  'static + Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + JsonSerialize
{
  /// The kind of this label.
  const KIND: LabelKind;

  /// Interpret a JSON value as this kind of label, if it's of the matching JSON type.
  fn from_json(value: &Value) -> Option<Self>;

  /// If this is a usable label.
  fn is_valid(&self) -> bool {
    true
  }
}

impl Label for String {
  const KIND: LabelKind = LabelKind::String;
  fn from_json(value: &Value) -> Option<Self> {
    value.as_str().map(Into::into)
  }
}

impl Label for bool {
  const KIND: LabelKind = LabelKind::Boolean;
  fn from_json(value: &Value) -> Option<Self> {
    value.as_bool()
  }
}

impl Label for i16 {
  const KIND: LabelKind = LabelKind::Short;
  #[allow(clippy::cast_possible_truncation)]
  fn from_json(value: &Value) -> Option<Self> {
    // Narrowed through an `i32`, wrapping
    value.as_f64().map(|value| (value as i32) as i16)
  }
}

impl Label for i32 {
  const KIND: LabelKind = LabelKind::Int;
  #[allow(clippy::cast_possible_truncation)]
  fn from_json(value: &Value) -> Option<Self> {
    value.as_f64().map(|value| value as i32)
  }
}

impl Label for i64 {
  const KIND: LabelKind = LabelKind::Long;
  #[allow(clippy::cast_possible_truncation)]
  fn from_json(value: &Value) -> Option<Self> {
    value.as_f64().map(|value| value as i64)
  }
  /// Labels are read as `f64`s, so an `i64` label must survive the trip through one.
  #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
  fn is_valid(&self) -> bool {
    ((*self as f64) as i64) == *self
  }
}

impl Label for f32 {
  const KIND: LabelKind = LabelKind::Float;
  #[allow(clippy::cast_possible_truncation)]
  fn from_json(value: &Value) -> Option<Self> {
    value.as_f64().map(|value| value as f32)
  }
  fn is_valid(&self) -> bool {
    self.is_finite()
  }
}

impl Label for f64 {
  const KIND: LabelKind = LabelKind::Double;
  fn from_json(value: &Value) -> Option<Self> {
    value.as_f64()
  }
  fn is_valid(&self) -> bool {
    self.is_finite()
  }
}

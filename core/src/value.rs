use alloc::{string::String, vec::Vec};

use crate::{Type, Writer};

/// A JSON value held in memory.
///
/// Objects preserve the order of their fields, including any duplicated keys.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
  /// The `null` unit value.
  Null,
  /// A boolean.
  Bool(bool),
  /// A number.
  Number(f64),
  /// A string.
  String(String),
  /// An array.
  Array(Vec<Value>),
  /// An object.
  Object(Vec<(String, Value)>),
}

impl Value {
  /// The type of this value.
  pub fn kind(&self) -> Type {
    match self {
      Value::Null => Type::Null,
      Value::Bool(_) => Type::Bool,
      Value::Number(_) => Type::Number,
      Value::String(_) => Type::String,
      Value::Array(_) => Type::Array,
      Value::Object(_) => Type::Object,
    }
  }

  /// If this value is `null`.
  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// This value as a `bool`, if it is one.
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as an `f64`, if it's a number.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Number(value) => Some(*value),
      _ => None,
    }
  }

  /// This value as a `str`, if it's a string.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(value) => Some(value),
      _ => None,
    }
  }

  /// The first field with this key, if this is an object containing it.
  pub fn get(&self, key: &str) -> Option<&Value> {
    match self {
      Value::Object(fields) => {
        fields.iter().find(|(name, _)| name == key).map(|(_, value)| value)
      }
      _ => None,
    }
  }
}

impl core::fmt::Display for Value {
  /// Display this value as compact JSON.
  ///
  /// A value containing a non-finite number isn't representable and is displayed as `null`.
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let mut writer = Writer::new().with_serialize_nulls(true);
    match writer.json_value(self).and_then(|()| writer.finish()) {
      Ok(json) => f.write_str(&json),
      Err(_) => f.write_str("null"),
    }
  }
}

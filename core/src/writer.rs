use core::fmt::Write;
use alloc::{string::String, vec::Vec};

use crate::{string::write_string, JsonError, Value};

/// An item within the stack, representing the state during writing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Scope {
  EmptyDocument,
  NonEmptyDocument,
  EmptyObject,
  NonEmptyObject,
  EmptyArray,
  NonEmptyArray,
}

/// The state of flattening.
///
/// The depths are the length of the stack when flattening began, identifying the object which
/// absorbs the flattened object's fields.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Flatten {
  Off,
  // The next object begun at this depth will be flattened
  Armed(usize),
  // An object at this depth is being flattened
  Active(usize),
}

/// A token for flattening, to be returned to [`Writer::end_flatten`].
///
/// This holds the prior state of flattening, allowing flattening to nest.
#[must_use]
#[derive(Debug)]
pub struct FlattenToken(Flatten);

/// A writer of a compact JSON document.
///
/// Names are deferred until their value is written, allowing a field whose value is `null` to be
/// omitted entirely (unless [`Writer::with_serialize_nulls`] is set).
#[derive(Debug)]
pub struct Writer {
  out: String,
  stack: Vec<Scope>,
  deferred_name: Option<String>,
  serialize_nulls: bool,
  flatten: Flatten,
}

impl Default for Writer {
  fn default() -> Self {
    Self::new()
  }
}

impl Writer {
  /// Create a new writer.
  pub fn new() -> Self {
    let mut stack = Vec::with_capacity(8);
    stack.push(Scope::EmptyDocument);
    Writer {
      out: String::new(),
      stack,
      deferred_name: None,
      serialize_nulls: false,
      flatten: Flatten::Off,
    }
  }

  /// Set whether fields whose value is `null` are written.
  ///
  /// By default, they're omitted. `null`s within arrays are always written.
  pub fn with_serialize_nulls(mut self, serialize_nulls: bool) -> Self {
    self.serialize_nulls = serialize_nulls;
    self
  }

  /// If fields whose value is `null` are written.
  pub fn serialize_nulls(&self) -> bool {
    self.serialize_nulls
  }

  /// The JSON written so far.
  pub fn as_str(&self) -> &str {
    &self.out
  }

  #[inline(always)]
  fn top(&self) -> Result<Scope, JsonError> {
    self.stack.last().copied().ok_or(JsonError::InvalidState("the writer's stack was empty"))
  }

  #[inline(always)]
  fn set_top(&mut self, scope: Scope) {
    if let Some(top) = self.stack.last_mut() {
      *top = scope;
    }
  }

  #[inline(always)]
  fn armed(&self) -> bool {
    self.flatten == Flatten::Armed(self.stack.len())
  }

  /// Write everything which precedes a value.
  fn before_value(&mut self) -> Result<(), JsonError> {
    if self.armed() {
      Err(JsonError::InvalidState("only an object may be flattened"))?;
    }
    match self.top()? {
      Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
      Scope::NonEmptyDocument => {
        Err(JsonError::InvalidState("the document already has a value"))?
      }
      Scope::EmptyArray => self.set_top(Scope::NonEmptyArray),
      Scope::NonEmptyArray => self.out.push(','),
      top @ (Scope::EmptyObject | Scope::NonEmptyObject) => {
        let Some(name) = self.deferred_name.take() else {
          Err(JsonError::InvalidState("a value within an object must be preceded by a name"))?
        };
        if top == Scope::NonEmptyObject {
          self.out.push(',');
        }
        write_string(&mut self.out, &name);
        self.out.push(':');
        self.set_top(Scope::NonEmptyObject);
      }
    }
    Ok(())
  }

  /// Write the name of the next field within the current object.
  ///
  /// The name is only written once its value is.
  pub fn name(&mut self, name: &str) -> Result<(), JsonError> {
    if self.armed() {
      Err(JsonError::InvalidState("only an object may be flattened"))?;
    }
    if !matches!(self.top()?, Scope::EmptyObject | Scope::NonEmptyObject) {
      Err(JsonError::InvalidState("a name may only be written within an object"))?;
    }
    if self.deferred_name.is_some() {
      Err(JsonError::InvalidState("a name was already written for the next value"))?;
    }
    self.deferred_name = Some(name.into());
    Ok(())
  }

  /// Begin an object.
  ///
  /// If flattening, this writes nothing and the object's fields are written to the enclosing
  /// object.
  pub fn begin_object(&mut self) -> Result<(), JsonError> {
    if let Flatten::Armed(depth) = self.flatten {
      if depth == self.stack.len() {
        self.flatten = Flatten::Active(depth);
        return Ok(());
      }
    }
    self.before_value()?;
    self.out.push('{');
    self.stack.push(Scope::EmptyObject);
    Ok(())
  }

  /// End an object.
  pub fn end_object(&mut self) -> Result<(), JsonError> {
    if self.deferred_name.is_some() {
      Err(JsonError::InvalidState("a name was written without a value"))?;
    }
    if self.flatten == Flatten::Active(self.stack.len()) {
      self.flatten = Flatten::Armed(self.stack.len());
      return Ok(());
    }
    if self.armed() {
      Err(JsonError::InvalidState("ended an object which is still flattening"))?;
    }
    if !matches!(self.top()?, Scope::EmptyObject | Scope::NonEmptyObject) {
      Err(JsonError::InvalidState("ended an object which isn't open"))?;
    }
    self.stack.pop();
    self.out.push('}');
    Ok(())
  }

  /// Begin an array.
  pub fn begin_array(&mut self) -> Result<(), JsonError> {
    self.before_value()?;
    self.out.push('[');
    self.stack.push(Scope::EmptyArray);
    Ok(())
  }

  /// End an array.
  pub fn end_array(&mut self) -> Result<(), JsonError> {
    if !matches!(self.top()?, Scope::EmptyArray | Scope::NonEmptyArray) {
      Err(JsonError::InvalidState("ended an array which isn't open"))?;
    }
    self.stack.pop();
    self.out.push(']');
    Ok(())
  }

  /// Flatten the next object into the currently open object.
  ///
  /// The next call to [`Writer::begin_object`] at the current depth won't write an opening
  /// brace, and its matching [`Writer::end_object`] won't write a closing brace, so the fields
  /// written between them become fields of the currently open object. Flattening nests, with
  /// each call needing to be paired with a call to [`Writer::end_flatten`].
  pub fn begin_flatten(&mut self) -> Result<FlattenToken, JsonError> {
    if !matches!(self.top()?, Scope::EmptyObject | Scope::NonEmptyObject) {
      Err(JsonError::InvalidState("flattening requires an open object"))?;
    }
    if self.deferred_name.is_some() {
      Err(JsonError::InvalidState("cannot flatten a field's value"))?;
    }
    let token = FlattenToken(self.flatten);
    self.flatten = Flatten::Armed(self.stack.len());
    Ok(token)
  }

  /// Stop flattening, restoring the state prior to the matching [`Writer::begin_flatten`].
  pub fn end_flatten(&mut self, token: FlattenToken) -> Result<(), JsonError> {
    if !self.armed() {
      Err(JsonError::InvalidState("ended flattening which wasn't begun or whose object is open"))?;
    }
    self.flatten = token.0;
    Ok(())
  }

  /// Write a string.
  pub fn value_str(&mut self, value: &str) -> Result<(), JsonError> {
    self.before_value()?;
    write_string(&mut self.out, value);
    Ok(())
  }

  /// Write a boolean.
  pub fn value_bool(&mut self, value: bool) -> Result<(), JsonError> {
    self.before_value()?;
    self.out.push_str(if value { "true" } else { "false" });
    Ok(())
  }

  /// Write a signed integer.
  pub fn value_i64(&mut self, value: i64) -> Result<(), JsonError> {
    self.before_value()?;
    // Writing to a `String` is infallible
    let _ = write!(self.out, "{value}");
    Ok(())
  }

  /// Write an unsigned integer.
  pub fn value_u64(&mut self, value: u64) -> Result<(), JsonError> {
    self.before_value()?;
    let _ = write!(self.out, "{value}");
    Ok(())
  }

  /// Write a floating-point number.
  ///
  /// This errors with [`JsonError::NonFinite`] for `NaN` and infinities, which JSON cannot
  /// represent.
  pub fn value_f64(&mut self, value: f64) -> Result<(), JsonError> {
    if !value.is_finite() {
      Err(JsonError::NonFinite)?;
    }
    self.before_value()?;
    #[cfg(not(feature = "zmij"))]
    let _ = write!(self.out, "{value}");
    #[cfg(feature = "zmij")]
    self.out.push_str(zmij::Buffer::new().format(value));
    Ok(())
  }

  /// Write `null`.
  ///
  /// If this is a field's value and nulls aren't serialized, the field is omitted.
  pub fn null(&mut self) -> Result<(), JsonError> {
    if self.deferred_name.is_some() && (!self.serialize_nulls) {
      self.deferred_name = None;
      return Ok(());
    }
    self.before_value()?;
    self.out.push_str("null");
    Ok(())
  }

  /// Write a [`Value`].
  ///
  /// Nulls within the value are subject to [`Writer::with_serialize_nulls`] as any other null.
  pub fn json_value(&mut self, value: &Value) -> Result<(), JsonError> {
    match value {
      Value::Null => self.null(),
      Value::Bool(value) => self.value_bool(*value),
      Value::Number(value) => self.value_f64(*value),
      Value::String(value) => self.value_str(value),
      Value::Array(values) => {
        self.begin_array()?;
        for value in values {
          self.json_value(value)?;
        }
        self.end_array()
      }
      Value::Object(fields) => {
        self.begin_object()?;
        for (name, value) in fields {
          self.name(name)?;
          self.json_value(value)?;
        }
        self.end_object()
      }
    }
  }

  /// Finish writing, returning the document.
  ///
  /// This errors if the document is incomplete.
  pub fn finish(self) -> Result<String, JsonError> {
    if (self.stack.len() != 1) || (self.stack[0] != Scope::NonEmptyDocument) {
      Err(JsonError::InvalidState("the document was incomplete"))?;
    }
    Ok(self.out)
  }
}

use alloc::{string::String, vec::Vec};

use crate::{io::Bytes, number, string, kind, JsonError, Type, Value};

/// The default bound on how deeply containers may be nested.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// An item within the stack, representing the state during reading.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Scope {
  /// The document's value has yet to be read.
  EmptyDocument,
  /// The document's value was read.
  NonEmptyDocument,
  /// An object with no fields read.
  EmptyObject,
  /// An object with a field read, expecting a `,` or its close.
  NonEmptyObject,
  /// A field's name was read, yet not its value.
  DanglingName,
  /// An array with no values read.
  EmptyArray,
  /// An array with a value read, expecting a `,` or its close.
  NonEmptyArray,
}

/// A pull reader for a JSON document.
///
/// The reader is driven token by token: objects are opened with [`Reader::begin_object`], their
/// fields iterated with [`Reader::has_next`] and [`Reader::next_name`] (or
/// [`Reader::select_name`]), and closed with [`Reader::end_object`]. Anything may be skipped with
/// [`Reader::skip_value`] or captured with [`Reader::read_value`].
///
/// A reader may be cloned, via [`Reader::peek_json`], to look ahead. The copy is independent: it
/// may be advanced, and dropped, without affecting the original.
#[derive(Clone, Debug)]
pub struct Reader<'bytes> {
  bytes: Bytes<'bytes>,
  stack: Vec<Scope>,
  max_depth: usize,
  fail_on_unknown: bool,
  // If the separators before the next value have already been consumed
  at_value: bool,
}

impl<'bytes> Reader<'bytes> {
  /// Create a new reader for the JSON document within `bytes`.
  pub fn new(bytes: &'bytes [u8]) -> Self {
    let mut stack = Vec::with_capacity(8);
    stack.push(Scope::EmptyDocument);
    Reader {
      bytes: Bytes::new(bytes),
      stack,
      max_depth: DEFAULT_MAX_DEPTH,
      fail_on_unknown: false,
      at_value: false,
    }
  }

  /// Bound how deeply containers may be nested.
  ///
  /// Opening a container beyond this depth raises [`JsonError::StackTooDeep`].
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }

  /// Set whether [`Reader::skip_name`] and [`Reader::skip_value`] should error.
  ///
  /// Decoders call these for fields they don't model. Setting this makes encountering such a
  /// field an error, useful for detecting fields which would otherwise be silently dropped.
  pub fn set_fail_on_unknown(&mut self, fail_on_unknown: bool) {
    self.fail_on_unknown = fail_on_unknown;
  }

  /// If skipping unknown names and values errors.
  pub fn fail_on_unknown(&self) -> bool {
    self.fail_on_unknown
  }

  /// The amount of bytes consumed.
  pub fn offset(&self) -> usize {
    self.bytes.offset()
  }

  /// The amount of containers currently open.
  pub fn depth(&self) -> usize {
    self.stack.len() - 1
  }

  /// Obtain an independent copy of this reader, positioned at the same point.
  ///
  /// This is used to inspect upcoming content without consuming it from `self`.
  pub fn peek_json(&self) -> Reader<'bytes> {
    self.clone()
  }

  #[inline(always)]
  fn top(&self) -> Result<Scope, JsonError> {
    self.stack.last().copied().ok_or(JsonError::InvalidState("the reader's stack was empty"))
  }

  #[inline(always)]
  fn set_top(&mut self, scope: Scope) {
    if let Some(top) = self.stack.last_mut() {
      *top = scope;
    }
  }

  /// Advance past a comma, erroring if it's trailing.
  fn advance_past_comma(&mut self) -> Result<(), JsonError> {
    let offset = self.bytes.offset();
    if self.bytes.read_byte()? != b',' {
      Err(JsonError::InvalidValue(offset))?;
    }
    self.bytes.skip_whitespace();
    if matches!(self.bytes.peek(0)?, b']' | b'}') {
      Err(JsonError::TrailingComma(offset))?;
    }
    Ok(())
  }

  /// Advance past everything before the next value, returning its first byte.
  ///
  /// This doesn't consume any of the value itself, and may be called repeatedly until the value
  /// is consumed (at which point `at_value` must be cleared).
  fn before_value(&mut self) -> Result<u8, JsonError> {
    if !self.at_value {
      self.bytes.skip_whitespace();
      match self.top()? {
        Scope::EmptyDocument => self.set_top(Scope::NonEmptyDocument),
        Scope::NonEmptyDocument => {
          Err(JsonError::InvalidState("the document's value was already read"))?
        }
        Scope::EmptyArray => self.set_top(Scope::NonEmptyArray),
        Scope::NonEmptyArray => self.advance_past_comma()?,
        Scope::DanglingName => {
          let offset = self.bytes.offset();
          if self.bytes.read_byte()? != b':' {
            Err(JsonError::InvalidKeyValueDelimiter(offset))?;
          }
          self.bytes.skip_whitespace();
          self.set_top(Scope::NonEmptyObject);
        }
        Scope::EmptyObject | Scope::NonEmptyObject => {
          Err(JsonError::InvalidState("expected a name, not a value"))?
        }
      }
      self.at_value = true;
    }

    let next = self.bytes.peek(0)?;
    if matches!(next, b',' | b']' | b'}' | b':') {
      Err(JsonError::InvalidValue(self.bytes.offset()))?;
    }
    Ok(next)
  }

  /// Advance past everything before the next name, including its opening quote.
  fn before_name(&mut self) -> Result<(), JsonError> {
    self.bytes.skip_whitespace();
    match self.top()? {
      Scope::EmptyObject => {}
      Scope::NonEmptyObject => self.advance_past_comma()?,
      _ => Err(JsonError::InvalidState("expected a value, not a name"))?,
    }
    let offset = self.bytes.offset();
    if self.bytes.read_byte()? != b'"' {
      Err(JsonError::InvalidKey(offset))?;
    }
    Ok(())
  }

  /// The type of the next value.
  ///
  /// This does not assert it's a valid instance of this class of items. It solely asserts if this
  /// is a valid item, it will be of this type.
  pub fn peek(&mut self) -> Result<Type, JsonError> {
    self.before_value().map(kind)
  }

  /// If the current object or array has another field or value.
  pub fn has_next(&mut self) -> Result<bool, JsonError> {
    match self.top()? {
      Scope::EmptyDocument | Scope::DanglingName => return Ok(true),
      Scope::NonEmptyDocument => return Ok(false),
      _ => {}
    }
    if self.at_value {
      return Ok(true);
    }

    self.bytes.skip_whitespace();
    let next = self.bytes.peek(0)?;
    Ok(match self.top()? {
      Scope::NonEmptyObject | Scope::NonEmptyArray => match next {
        b',' => true,
        b'}' | b']' => false,
        _ => Err(JsonError::InvalidValue(self.bytes.offset()))?,
      },
      _ => !matches!(next, b'}' | b']'),
    })
  }

  fn open(&mut self, delimiter: u8, expected: Type, scope: Scope) -> Result<(), JsonError> {
    let next = self.before_value()?;
    if next != delimiter {
      Err(JsonError::TypeError { expected, found: kind(next) })?;
    }
    if self.depth() >= self.max_depth {
      Err(JsonError::StackTooDeep(self.max_depth))?;
    }
    self.bytes.read_byte()?;
    self.stack.push(scope);
    self.at_value = false;
    Ok(())
  }

  fn close(&mut self, delimiter: u8) -> Result<(), JsonError> {
    match (self.top()?, delimiter) {
      (Scope::EmptyObject | Scope::NonEmptyObject, b'}') |
      (Scope::EmptyArray | Scope::NonEmptyArray, b']') => {}
      _ => Err(JsonError::InvalidState("closed a structure which isn't open"))?,
    }
    self.bytes.skip_whitespace();
    let offset = self.bytes.offset();
    if self.bytes.read_byte()? != delimiter {
      Err(JsonError::MismatchedDelimiter(offset))?;
    }
    self.stack.pop();
    self.at_value = false;
    Ok(())
  }

  /// Consume the opening of an object.
  pub fn begin_object(&mut self) -> Result<(), JsonError> {
    self.open(b'{', Type::Object, Scope::EmptyObject)
  }

  /// Consume the closing of an object.
  ///
  /// All of the object's fields must have been consumed.
  pub fn end_object(&mut self) -> Result<(), JsonError> {
    self.close(b'}')
  }

  /// Consume the opening of an array.
  pub fn begin_array(&mut self) -> Result<(), JsonError> {
    self.open(b'[', Type::Array, Scope::EmptyArray)
  }

  /// Consume the closing of an array.
  ///
  /// All of the array's values must have been consumed.
  pub fn end_array(&mut self) -> Result<(), JsonError> {
    self.close(b']')
  }

  /// Consume the next field's name.
  pub fn next_name(&mut self) -> Result<String, JsonError> {
    self.before_name()?;
    let name = string::read_string(&mut self.bytes)?;
    self.set_top(Scope::DanglingName);
    Ok(name)
  }

  /// Consume the next field's name if it's one of `names`, returning its index within `names`.
  ///
  /// If the name isn't one of `names`, `None` is returned and the name is not consumed. It may
  /// then be read with [`Reader::next_name`] or skipped with [`Reader::skip_name`].
  pub fn select_name(&mut self, names: &[&str]) -> Result<Option<usize>, JsonError> {
    let (bytes, top) = (self.bytes, self.top()?);
    let name = self.next_name()?;
    let selected = names.iter().position(|candidate| *candidate == name);
    if selected.is_none() {
      self.bytes = bytes;
      self.set_top(top);
    }
    Ok(selected)
  }

  fn skip_name_unchecked(&mut self) -> Result<(), JsonError> {
    self.before_name()?;
    string::skip_string(&mut self.bytes)?;
    self.set_top(Scope::DanglingName);
    Ok(())
  }

  /// Skip the next field's name.
  ///
  /// This errors if [`Reader::set_fail_on_unknown`] was set.
  pub fn skip_name(&mut self) -> Result<(), JsonError> {
    if self.fail_on_unknown {
      Err(JsonError::UnknownName(self.bytes.offset()))?;
    }
    self.skip_name_unchecked()
  }

  /// Consume the next value as a string.
  pub fn next_string(&mut self) -> Result<String, JsonError> {
    let next = self.before_value()?;
    if next != b'"' {
      Err(JsonError::TypeError { expected: Type::String, found: kind(next) })?;
    }
    self.bytes.read_byte()?;
    let result = string::read_string(&mut self.bytes)?;
    self.at_value = false;
    Ok(result)
  }

  /// Consume the next value as a number, interpreting its textual representation with `parse`.
  ///
  /// A string containing a number is also accepted. The reader is only advanced on success.
  fn next_number<T>(
    &mut self,
    parse: impl FnOnce(&str, usize) -> Result<T, JsonError>,
  ) -> Result<T, JsonError> {
    let next = self.before_value()?;
    let offset = self.bytes.offset();
    let mut bytes = self.bytes;
    let result = match kind(next) {
      Type::Number => parse(number::read_number(&mut bytes)?, offset)?,
      Type::String => {
        bytes.read_byte()?;
        let string = string::read_string(&mut bytes)?;
        let mut quoted = Bytes::new(string.as_bytes());
        let not_a_number = JsonError::TypeError { expected: Type::Number, found: Type::String };
        let number = number::read_number(&mut quoted).map_err(|_| not_a_number)?;
        if !quoted.is_empty() {
          Err(not_a_number)?;
        }
        parse(number, offset)?
      }
      found => Err(JsonError::TypeError { expected: Type::Number, found })?,
    };
    self.bytes = bytes;
    self.at_value = false;
    Ok(result)
  }

  /// Consume the next value as an `f64`.
  pub fn next_f64(&mut self) -> Result<f64, JsonError> {
    self.next_number(number::to_f64)
  }

  /// Consume the next value as an `i64`.
  ///
  /// This is exact for integers. Numbers with a fractional part, or outside of the range of an
  /// `i64`, raise [`JsonError::NumberOutOfRange`].
  pub fn next_i64(&mut self) -> Result<i64, JsonError> {
    self.next_number(number::to_i64)
  }

  /// Consume the next value as an `u64`.
  pub fn next_u64(&mut self) -> Result<u64, JsonError> {
    self.next_number(number::to_u64)
  }

  /// Consume the next value as a `bool`.
  pub fn next_bool(&mut self) -> Result<bool, JsonError> {
    let next = self.before_value()?;
    let mut bytes = self.bytes;
    let result = match next {
      b't' => {
        bytes.read_literal(b"true")?;
        true
      }
      b'f' => {
        bytes.read_literal(b"false")?;
        false
      }
      _ => Err(JsonError::TypeError { expected: Type::Bool, found: kind(next) })?,
    };
    self.bytes = bytes;
    self.at_value = false;
    Ok(result)
  }

  /// Consume the next value as `null`.
  pub fn next_null(&mut self) -> Result<(), JsonError> {
    let next = self.before_value()?;
    if next != b'n' {
      Err(JsonError::TypeError { expected: Type::Null, found: kind(next) })?;
    }
    self.bytes.read_literal(b"null")?;
    self.at_value = false;
    Ok(())
  }

  fn skip(&mut self) -> Result<(), JsonError> {
    match self.peek()? {
      Type::Object => {
        self.begin_object()?;
        while self.has_next()? {
          self.skip_name_unchecked()?;
          self.skip()?;
        }
        self.end_object()
      }
      Type::Array => {
        self.begin_array()?;
        while self.has_next()? {
          self.skip()?;
        }
        self.end_array()
      }
      Type::String => {
        self.bytes.read_byte()?;
        string::skip_string(&mut self.bytes)?;
        self.at_value = false;
        Ok(())
      }
      Type::Number => {
        number::read_number(&mut self.bytes)?;
        self.at_value = false;
        Ok(())
      }
      Type::Bool => self.next_bool().map(|_| ()),
      Type::Null => self.next_null(),
    }
  }

  /// Skip the next value, including all of its contents.
  ///
  /// This errors if [`Reader::set_fail_on_unknown`] was set.
  pub fn skip_value(&mut self) -> Result<(), JsonError> {
    if self.fail_on_unknown {
      Err(JsonError::UnknownValue(self.bytes.offset()))?;
    }
    self.skip()
  }

  /// Consume the next value, including all of its contents, into a [`Value`].
  pub fn read_value(&mut self) -> Result<Value, JsonError> {
    Ok(match self.peek()? {
      Type::Object => {
        self.begin_object()?;
        let mut fields = Vec::new();
        while self.has_next()? {
          let name = self.next_name()?;
          fields.push((name, self.read_value()?));
        }
        self.end_object()?;
        Value::Object(fields)
      }
      Type::Array => {
        self.begin_array()?;
        let mut values = Vec::new();
        while self.has_next()? {
          values.push(self.read_value()?);
        }
        self.end_array()?;
        Value::Array(values)
      }
      Type::String => Value::String(self.next_string()?),
      Type::Number => Value::Number(self.next_f64()?),
      Type::Bool => Value::Bool(self.next_bool()?),
      Type::Null => {
        self.next_null()?;
        Value::Null
      }
    })
  }

  /// Assert the document was entirely read.
  ///
  /// This errors if the document's value wasn't (completely) consumed or if anything other than
  /// whitespace follows it.
  pub fn finish(mut self) -> Result<(), JsonError> {
    if (self.depth() != 0) || (self.top()? != Scope::NonEmptyDocument) || self.at_value {
      Err(JsonError::InvalidState("the document's value wasn't fully read"))?;
    }
    self.bytes.skip_whitespace();
    if !self.bytes.is_empty() {
      Err(JsonError::TrailingBytes(self.bytes.offset()))?;
    }
    Ok(())
  }
}

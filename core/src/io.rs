//! IO primitives around bytes.

use crate::JsonError;

/// A cursor over a `&[u8]`.
///
/// This is `Copy`, allowing a position to be saved and restored by value.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bytes<'bytes> {
  bytes: &'bytes [u8],
  offset: usize,
}

impl<'bytes> Bytes<'bytes> {
  #[inline(always)]
  pub(crate) fn new(bytes: &'bytes [u8]) -> Self {
    Self { bytes, offset: 0 }
  }

  /// The amount of bytes consumed so far.
  #[inline(always)]
  pub(crate) fn offset(&self) -> usize {
    self.offset
  }

  /// Peek at a byte.
  #[inline(always)]
  pub(crate) fn peek(&self, i: usize) -> Result<u8, JsonError> {
    self.bytes.get(i).copied().ok_or(JsonError::UnexpectedEnd(self.offset + i))
  }

  /// Read a fixed amount of bytes from the container.
  #[inline(always)]
  pub(crate) fn read_bytes(&mut self, bytes: usize) -> Result<&'bytes [u8], JsonError> {
    if self.bytes.len() < bytes {
      Err(JsonError::UnexpectedEnd(self.offset + self.bytes.len()))?;
    }
    let res = &self.bytes[.. bytes];
    self.bytes = &self.bytes[bytes ..];
    self.offset += bytes;
    Ok(res)
  }

  /// Read a byte from the container.
  #[inline(always)]
  pub(crate) fn read_byte(&mut self) -> Result<u8, JsonError> {
    Ok(self.read_bytes(1)?[0])
  }

  /// Advance past any whitespace.
  #[inline(always)]
  pub(crate) fn skip_whitespace(&mut self) {
    // https://datatracker.ietf.org/doc/html/rfc8259#section-2 defines whitespace as follows
    let whitespace = self
      .bytes
      .iter()
      .take_while(|b| matches!(**b, b'\x20' | b'\x09' | b'\x0A' | b'\x0D'))
      .count();
    self.bytes = &self.bytes[whitespace ..];
    self.offset += whitespace;
  }

  /// Read the expected literal, such as `true`.
  #[inline(always)]
  pub(crate) fn read_literal(&mut self, literal: &[u8]) -> Result<(), JsonError> {
    let offset = self.offset;
    if self.read_bytes(literal.len())? != literal {
      Err(JsonError::InvalidValue(offset))?;
    }
    Ok(())
  }

  /// If the container has been exhausted.
  #[inline(always)]
  pub(crate) fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

#[test]
fn bytes_cursor() {
  let mut bytes = Bytes::new(b" \t\n{}");
  bytes.skip_whitespace();
  assert_eq!(bytes.offset(), 3);
  let saved = bytes;
  assert_eq!(bytes.read_byte().unwrap(), b'{');
  assert_eq!(saved.peek(0).unwrap(), b'{');
  assert_eq!(bytes.peek(0).unwrap(), b'}');
  assert_eq!(bytes.peek(1), Err(JsonError::UnexpectedEnd(5)));
  assert_eq!(bytes.read_bytes(2), Err(JsonError::UnexpectedEnd(5)));
}

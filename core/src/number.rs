use core::str::FromStr;

use crate::{io::Bytes, JsonError};

/// The amount of digits present starting at `start`.
#[inline(always)]
fn digits(bytes: &Bytes<'_>, start: usize) -> usize {
  let mut i = start;
  while bytes.peek(i).is_ok_and(|b| b.is_ascii_digit()) {
    i += 1;
  }
  i - start
}

/// Read the number immediately present within the bytes, returning its textual representation.
///
/// This applies the syntax from RFC 8259,
/// `[ minus ] int [ decimal-point 1*DIGIT ] [ e [ minus / plus ] 1*DIGIT ]`, and requires the
/// number be followed by a delimiter (or the end of the bytes).
pub(crate) fn read_number<'bytes>(bytes: &mut Bytes<'bytes>) -> Result<&'bytes str, JsonError> {
  let invalid = JsonError::InvalidValue(bytes.offset());

  let mut len = 0;
  if bytes.peek(0)? == b'-' {
    len += 1;
  }

  // We do not allow leading zeroes for the integer part, unless it's solely zero
  match bytes.peek(len)? {
    b'0' => len += 1,
    b'1' ..= b'9' => len += digits(bytes, len),
    _ => Err(invalid)?,
  }

  if bytes.peek(len).ok() == Some(b'.') {
    len += 1;
    let fraction = digits(bytes, len);
    if fraction == 0 {
      Err(invalid)?;
    }
    len += fraction;
  }

  if matches!(bytes.peek(len).ok(), Some(b'e' | b'E')) {
    len += 1;
    if matches!(bytes.peek(len).ok(), Some(b'+' | b'-')) {
      len += 1;
    }
    let exponent = digits(bytes, len);
    if exponent == 0 {
      Err(invalid)?;
    }
    len += exponent;
  }

  // separator, array closure, object closure, whitespace
  if let Ok(next) = bytes.peek(len) {
    if !matches!(next, b',' | b']' | b'}' | b'\x20' | b'\x09' | b'\x0A' | b'\x0D') {
      Err(invalid)?;
    }
  }

  // Only ASCII was accepted above, so this won't error
  core::str::from_utf8(bytes.read_bytes(len)?).map_err(|_| invalid)
}

/// Interpret a number as an `f64`.
///
/// This returns an error if the value's range exceeds `f64`'s, as RFC-8259 JSON is not able to
/// represent infinite values.
pub(crate) fn to_f64(number: &str, offset: usize) -> Result<f64, JsonError> {
  let value = f64::from_str(number).map_err(|_| JsonError::InvalidValue(offset))?;
  if !value.is_finite() {
    Err(JsonError::NumberOutOfRange(offset))?;
  }
  Ok(value)
}

/// Interpret a number as an `i64`.
///
/// Numbers written with a fractional part or exponent are accepted if, once evaluated, they have
/// no fractional part (such as "10.0" or "1e3").
#[allow(clippy::float_cmp, clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn to_i64(number: &str, offset: usize) -> Result<i64, JsonError> {
  if let Ok(value) = i64::from_str(number) {
    return Ok(value);
  }
  let value = to_f64(number, offset)?;
  if ((value % 1.0) != 0.0) || (value < (i64::MIN as f64)) || (value >= (i64::MAX as f64)) {
    Err(JsonError::NumberOutOfRange(offset))?;
  }
  Ok(value as i64)
}

/// Interpret a number as an `u64`.
#[allow(
  clippy::float_cmp,
  clippy::cast_possible_truncation,
  clippy::cast_precision_loss,
  clippy::cast_sign_loss
)]
pub(crate) fn to_u64(number: &str, offset: usize) -> Result<u64, JsonError> {
  if let Ok(value) = u64::from_str(number) {
    return Ok(value);
  }
  let value = to_f64(number, offset)?;
  if ((value % 1.0) != 0.0) || (value < 0.0) || (value >= (u64::MAX as f64)) {
    Err(JsonError::NumberOutOfRange(offset))?;
  }
  Ok(value as u64)
}

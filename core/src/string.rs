use core::fmt::Write;
use alloc::string::String;

use crate::{io::Bytes, JsonError};

/// Read four hex characters as a UTF-16 code unit.
#[inline(always)]
fn read_hex(bytes: &mut Bytes<'_>) -> Result<u16, JsonError> {
  let offset = bytes.offset();
  let mut result = 0u16;
  for b in bytes.read_bytes(4)? {
    let nibble = match b {
      b'0' ..= b'9' => b - b'0',
      b'a' ..= b'f' => b - b'a' + 10,
      b'A' ..= b'F' => b - b'A' + 10,
      _ => Err(JsonError::InvalidValue(offset))?,
    };
    result = (result << 4) | u16::from(nibble);
  }
  Ok(result)
}

/// Read the character represented by an escape sequence, with the `\` already consumed.
fn read_escape(bytes: &mut Bytes<'_>) -> Result<char, JsonError> {
  let offset = bytes.offset();
  Ok(match bytes.read_byte()? {
    b'"' => '"',
    b'\\' => '\\',
    b'/' => '/',
    b'b' => '\x08',
    b'f' => '\x0c',
    b'n' => '\n',
    b'r' => '\r',
    b't' => '\t',
    b'u' => {
      let first = read_hex(bytes)?;
      if (0xd800 ..= 0xdbff).contains(&first) {
        // A high surrogate is only meaningful when immediately followed by a low surrogate
        if bytes.read_bytes(2)? != b"\\u" {
          Err(JsonError::InvalidValue(offset))?;
        }
        let second = read_hex(bytes)?;
        if !(0xdc00 ..= 0xdfff).contains(&second) {
          Err(JsonError::InvalidValue(offset))?;
        }
        let code =
          0x10000 + ((u32::from(first) - 0xd800) << 10) + (u32::from(second) - 0xdc00);
        char::from_u32(code).ok_or(JsonError::InvalidValue(offset))?
      } else {
        // Lone low surrogates are rejected here as they aren't valid `char`s
        char::from_u32(u32::from(first)).ok_or(JsonError::InvalidValue(offset))?
      }
    }
    _ => Err(JsonError::InvalidValue(offset))?,
  })
}

/// Read a just-opened string, writing its contents into `sink` if one is provided.
///
/// This consumes the closing quote.
fn scan_string(bytes: &mut Bytes<'_>, mut sink: Option<&mut String>) -> Result<(), JsonError> {
  loop {
    let mut run = 0;
    loop {
      match bytes.peek(run)? {
        b'"' | b'\\' => break,
        // https://datatracker.ietf.org/doc/html/rfc8259#section-7
        0x00 ..= 0x1f => Err(JsonError::InvalidValue(bytes.offset() + run))?,
        _ => run += 1,
      }
    }

    // `"` and `\` are ASCII so this will never split a UTF-8 codepoint
    let offset = bytes.offset();
    let run = bytes.read_bytes(run)?;
    let run = core::str::from_utf8(run).map_err(|_| JsonError::InvalidValue(offset))?;
    if let Some(sink) = sink.as_deref_mut() {
      sink.push_str(run);
    }

    if bytes.read_byte()? == b'"' {
      return Ok(());
    }
    let escaped = read_escape(bytes)?;
    if let Some(sink) = sink.as_deref_mut() {
      sink.push(escaped);
    }
  }
}

/// Read a just-opened string.
pub(crate) fn read_string(bytes: &mut Bytes<'_>) -> Result<String, JsonError> {
  let mut result = String::new();
  scan_string(bytes, Some(&mut result))?;
  Ok(result)
}

/// Advance past a just-opened string.
pub(crate) fn skip_string(bytes: &mut Bytes<'_>) -> Result<(), JsonError> {
  scan_string(bytes, None)
}

/// Write a string, with its quotes, escaping as necessary.
pub(crate) fn write_string(out: &mut String, value: &str) {
  out.push('"');
  for char in value.chars() {
    match char {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\x08' => out.push_str("\\b"),
      '\x0c' => out.push_str("\\f"),
      '\x00' ..= '\x1f' => {
        // Writing to a `String` is infallible
        let _ = write!(out, "\\u{:04x}", u32::from(char));
      }
      _ => out.push(char),
    }
  }
  out.push('"');
}

use tagged_json::{Type, Reader};
use serde_json::Value;

#[cfg(test)]
mod polymorphic;

/*
  The following are _extremely slow_ tests for equivalence between these two readings. We iterate
  over every value within the `serde_json::Value`, finding each individual unit value, and then
  create a new `Reader` to navigate to that specific value for comparison purposes.
*/

#[derive(Clone)]
enum PathElement {
  Field(String),
  Array(usize),
}

/// Navigate the reader to the value at this path.
fn descend(reader: &mut Reader<'_>, path: &[PathElement]) {
  for element in path {
    match element {
      PathElement::Field(field) => {
        reader.begin_object().unwrap();
        loop {
          assert!(reader.has_next().unwrap());
          if reader.select_name(&[field.as_str()]).unwrap().is_some() {
            break;
          }
          reader.skip_name().unwrap();
          reader.skip_value().unwrap();
        }
      }
      PathElement::Array(i) => {
        reader.begin_array().unwrap();
        for _ in 0 .. *i {
          assert!(reader.has_next().unwrap());
          reader.skip_value().unwrap();
        }
        assert!(reader.has_next().unwrap());
      }
    }
  }
}

fn check_null(encoding: &[u8], _value: &Value, path: &[PathElement]) {
  let mut reader = Reader::new(encoding);
  descend(&mut reader, path);
  assert_eq!(reader.peek().unwrap(), Type::Null);
  assert!(reader.next_bool().is_err());
  reader.next_null().unwrap();
}

fn check_bool(encoding: &[u8], value: &Value, path: &[PathElement]) {
  let mut reader = Reader::new(encoding);
  descend(&mut reader, path);
  assert_eq!(reader.peek().unwrap(), Type::Bool);
  assert!(reader.next_null().is_err());
  assert_eq!(reader.next_bool().unwrap(), value.as_bool().unwrap());
}

pub fn check_float(number: f64, expected: f64) {
  // 0.1% of the smaller number
  let allowed_deviation = number.min(expected).abs() / 1000.0;
  assert!((number - expected).abs() <= allowed_deviation);
}

fn check_number(encoding: &[u8], value: &Value, path: &[PathElement]) {
  let mut reader = Reader::new(encoding);
  descend(&mut reader, path);
  assert_eq!(reader.peek().unwrap(), Type::Number);
  let expected = value.as_number().unwrap();
  if expected.is_i64() {
    assert_eq!(reader.next_i64().unwrap(), expected.as_i64().unwrap());
  } else if expected.is_u64() {
    assert_eq!(reader.next_u64().unwrap(), expected.as_u64().unwrap());
  } else {
    check_float(reader.next_f64().unwrap(), expected.as_f64().unwrap());
  }
}

fn check_string(encoding: &[u8], value: &Value, path: &[PathElement]) {
  let mut reader = Reader::new(encoding);
  descend(&mut reader, path);
  assert_eq!(reader.peek().unwrap(), Type::String);
  assert!(value.as_str().unwrap() == reader.next_string().unwrap());
}

fn check_object(encoding: &[u8], value: &Value, path: &mut Vec<PathElement>) {
  let value = value.as_object().unwrap();

  // Check the length of the object
  {
    let mut reader = Reader::new(encoding);
    descend(&mut reader, path);
    assert_eq!(reader.peek().unwrap(), Type::Object);
    reader.begin_object().unwrap();
    let mut len = 0;
    while reader.has_next().unwrap() {
      let name = reader.next_name().unwrap();
      assert!(value.contains_key(&name));
      reader.skip_value().unwrap();
      len += 1;
    }
    reader.end_object().unwrap();
    assert_eq!(value.len(), len);
  }

  // Check each value within the object
  for (field, value) in value {
    path.push(PathElement::Field(field.clone()));
    check_value_internal(encoding, value, path);
    path.pop();
  }
}

fn check_array(encoding: &[u8], value: &Value, path: &mut Vec<PathElement>) {
  let value = value.as_array().unwrap();

  // Check the length of the array
  {
    let mut reader = Reader::new(encoding);
    descend(&mut reader, path);
    assert_eq!(reader.peek().unwrap(), Type::Array);
    reader.begin_array().unwrap();
    let mut len = 0;
    while reader.has_next().unwrap() {
      reader.skip_value().unwrap();
      len += 1;
    }
    reader.end_array().unwrap();
    assert_eq!(value.len(), len);
  }

  // Check each value within the array
  for (i, value) in value.iter().enumerate() {
    path.push(PathElement::Array(i));
    check_value_internal(encoding, value, path);
    path.pop();
  }
}

fn check_value_internal(encoding: &[u8], value: &Value, path: &mut Vec<PathElement>) {
  match value {
    Value::Null => check_null(encoding, value, path),
    Value::Bool(_) => check_bool(encoding, value, path),
    Value::Number(_) => check_number(encoding, value, path),
    Value::String(_) => check_string(encoding, value, path),
    Value::Array(_) => check_array(encoding, value, path),
    Value::Object(_) => check_object(encoding, value, path),
  }
}

/// Check an in-memory reading, from `tagged-json`, is equivalent to `serde_json`'s.
pub fn check_values_equivalent(ours: &tagged_json::Value, theirs: &Value) {
  match (ours, theirs) {
    (tagged_json::Value::Null, Value::Null) => {}
    (tagged_json::Value::Bool(ours), Value::Bool(theirs)) => assert_eq!(ours, theirs),
    (tagged_json::Value::Number(ours), Value::Number(theirs)) => {
      check_float(*ours, theirs.as_f64().unwrap())
    }
    (tagged_json::Value::String(ours), Value::String(theirs)) => assert_eq!(ours, theirs),
    (tagged_json::Value::Array(ours), Value::Array(theirs)) => {
      assert_eq!(ours.len(), theirs.len());
      for (ours, theirs) in ours.iter().zip(theirs) {
        check_values_equivalent(ours, theirs);
      }
    }
    (tagged_json::Value::Object(ours), Value::Object(theirs)) => {
      assert_eq!(ours.len(), theirs.len());
      for (key, value) in ours {
        check_values_equivalent(value, &theirs[key]);
      }
    }
    _ => panic!("{ours:?} was read for {theirs:?}"),
  }
}

pub fn check_value(encoding: &[u8], value: &Value) {
  check_value_internal(encoding, value, &mut vec![]);

  let mut reader = Reader::new(encoding);
  let read = reader.read_value().unwrap();
  reader.finish().unwrap();
  check_values_equivalent(&read, value);
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;
  use rand_core::{RngCore, OsRng};
  use tagged_json::Writer;
  use super::*;

  #[allow(clippy::cast_possible_truncation)]
  pub(crate) fn random_string() -> String {
    let mut res = String::new();
    for _ in 0 .. (OsRng.next_u64() % 128) {
      if (OsRng.next_u64() % 2) == 1 {
        // ASCII
        res.push(char::from_u32((OsRng.next_u64() % 128) as u32).unwrap());
      } else {
        // Unicode
        res.push(loop {
          if let Some(char) = char::from_u32(OsRng.next_u64() as u32) {
            // Skip ASCII as those are intended to be included by the other branch
            // Skip the byte-order mark as implementations are allowed to ignore/reject it
            if char.is_ascii() || (char == '\u{feff}') {
              continue;
            }
            break char;
          }
        });
      }
    }
    res
  }

  fn random_value(depth: usize) -> Value {
    let modulus = if depth == 8 { 4 } else { 6 };
    match OsRng.next_u64() % modulus {
      0 => Value::Null,
      1 => Value::Bool((OsRng.next_u64() % 2) == 1),
      2 => Value::Number(match OsRng.next_u64() % 3 {
        0 => serde_json::Number::from(OsRng.next_u64()),
        #[allow(clippy::cast_possible_wrap)]
        1 => serde_json::Number::from(OsRng.next_u64() as i64),
        2 => loop {
          if let Some(float) = serde_json::Number::from_f64(f64::from_bits(OsRng.next_u64())) {
            break float;
          }
        },
        _ => unreachable!(),
      }),
      3 => Value::String(random_string()),
      4 => Value::Array({
        let mut res = vec![];
        for _ in 0 .. (OsRng.next_u64() % 8) {
          res.push(random_value(depth + 1));
        }
        res
      }),
      5 => Value::Object({
        let mut res = serde_json::Map::new();
        for _ in 0 .. (OsRng.next_u64() % 8) {
          res.insert(random_string(), random_value(depth + 1));
        }
        res
      }),
      _ => unreachable!(),
    }
  }

  #[test]
  fn fuzz() {
    for i in 0 .. 100 {
      dbg!(i);
      let value = dbg!(loop {
        let value = random_value(0);
        if matches!(value, Value::Object(_) | Value::Array(_)) {
          break value;
        }
      });
      let bytes = value.to_string().into_bytes();
      let bytes = bytes.as_slice();

      check_value(bytes, &value);

      // Write what was read, and check `serde_json` reads it as the original
      let mut reader = Reader::new(bytes);
      let read = reader.read_value().unwrap();
      let mut writer = Writer::new().with_serialize_nulls(true);
      writer.json_value(&read).unwrap();
      let written = writer.finish().unwrap();
      check_values_equivalent(&read, &serde_json::Value::from_str(&written).unwrap());
    }
  }

  #[test]
  fn whitespace() {
    let value = serde_json::json!({ "a": [1, { "b": null }, "c"], "d": true });
    let pretty = serde_json::to_string_pretty(&value).unwrap();
    check_value(pretty.as_bytes(), &value);
  }
}

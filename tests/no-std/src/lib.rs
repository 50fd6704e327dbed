#![no_std]

pub use tagged_json;

#[cfg(feature = "alloc")]
pub use tagged_json_traits;
#[cfg(feature = "alloc")]
pub use tagged_json_derive;
#[cfg(feature = "alloc")]
pub use tagged_json_polymorphic;

/// Read an `i64` with no standard library available.
pub fn read_i64(json: &[u8]) -> Result<i64, tagged_json::JsonError> {
  let mut reader = tagged_json::Reader::new(json);
  let value = reader.next_i64()?;
  reader.finish()?;
  Ok(value)
}

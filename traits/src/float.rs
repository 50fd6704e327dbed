use alloc::string::ToString;

use crate::{Reader, Writer, JsonError, Error, JsonDeserialize, JsonSerialize};

impl JsonDeserialize for f64 {
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    Ok(reader.next_f64()?)
  }
}
impl JsonSerialize for f64 {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    Ok(writer.value_f64(*self)?)
  }
}

impl JsonDeserialize for f32 {
  /// This rounds to the nearest `f32`, erroring if the value exceeds the range of an `f32`.
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    let offset = reader.offset();
    #[allow(clippy::cast_possible_truncation)]
    let value = reader.next_f64()? as f32;
    if !value.is_finite() {
      Err(JsonError::NumberOutOfRange(offset))?;
    }
    Ok(value)
  }
}
impl JsonSerialize for f32 {
  /// This writes the shortest representation which round-trips as an `f32`, not the expansion
  /// of the `f32` as an `f64`.
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    if !self.is_finite() {
      Err(JsonError::NonFinite)?;
    }
    let value = self.to_string().parse::<f64>().map_err(|_| JsonError::NonFinite)?;
    Ok(writer.value_f64(value)?)
  }
}

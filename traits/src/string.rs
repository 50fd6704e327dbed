use alloc::string::String;

use crate::{Reader, Writer, Error, JsonDeserialize, JsonSerialize};

impl JsonDeserialize for String {
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    Ok(reader.next_string()?)
  }
}
impl JsonSerialize for String {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    self.as_str().serialize(writer)
  }
}
impl JsonSerialize for str {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    Ok(writer.value_str(self)?)
  }
}
impl<T: ?Sized + JsonSerialize> JsonSerialize for &T {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    T::serialize(self, writer)
  }
}

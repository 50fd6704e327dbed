use alloc::boxed::Box;

use crate::{Reader, Writer, Error, JsonDeserialize, JsonSerialize};

impl<T: JsonDeserialize> JsonDeserialize for Box<T> {
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    T::deserialize(reader).map(Box::new)
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for Box<T> {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    T::serialize(self, writer)
  }
}

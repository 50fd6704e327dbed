use alloc::vec::Vec;

use crate::{Reader, Writer, Error, JsonDeserialize, JsonSerialize};

impl<T: JsonDeserialize> JsonDeserialize for Vec<T> {
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    let mut res = Vec::new();
    reader.begin_array()?;
    while reader.has_next()? {
      res.push(T::deserialize(reader)?);
    }
    reader.end_array()?;
    Ok(res)
  }
}

impl<T: JsonSerialize> JsonSerialize for [T] {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    writer.begin_array()?;
    for item in self {
      item.serialize(writer)?;
    }
    Ok(writer.end_array()?)
  }
}
impl<T: JsonSerialize, const N: usize> JsonSerialize for [T; N] {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    self.as_slice().serialize(writer)
  }
}
impl<T: JsonSerialize> JsonSerialize for Vec<T> {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    self.as_slice().serialize(writer)
  }
}

#[test]
fn sequences() {
  use crate::{from_slice, to_string, Type, JsonError};
  assert_eq!(from_slice::<Vec<Vec<u8>>>(b"[[], [1, 2]]").unwrap(), vec![vec![], vec![1, 2]]);
  assert!(matches!(
    from_slice::<Vec<u8>>(b"{}"),
    Err(Error::Json(JsonError::TypeError { expected: Type::Array, found: Type::Object }))
  ));
  assert_eq!(to_string(&vec![vec![1u8], vec![]]).unwrap(), "[[1],[]]");
}

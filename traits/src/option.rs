use crate::{Reader, Writer, Type, Error, JsonDeserialize, JsonSerialize};

impl<T: JsonDeserialize> JsonDeserialize for Option<T> {
  /// This will accept `null` as a representation of `None`.
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    if reader.peek()? == Type::Null {
      reader.next_null()?;
      return Ok(None);
    }
    T::deserialize(reader).map(Some)
  }
}

impl<T: JsonSerialize> JsonSerialize for Option<T> {
  /// This will serialize `Some(value)` as `value` and `None` as `null`.
  ///
  /// When this is the value of a field, the field is omitted unless the writer serializes nulls.
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    match self {
      Some(value) => value.serialize(writer),
      None => Ok(writer.null()?),
    }
  }
}

#[test]
fn option() {
  use crate::{from_slice, to_string};
  assert_eq!(from_slice::<Option<u8>>(b"null").unwrap(), None);
  assert_eq!(from_slice::<Option<u8>>(b"1").unwrap(), Some(1));
  assert_eq!(from_slice::<Vec<Option<u8>>>(b"[null, 2]").unwrap(), vec![None, Some(2)]);
  assert_eq!(to_string(&[None, Some(1u8)]).unwrap(), "[null,1]");
}

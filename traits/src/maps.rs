use alloc::{string::String, collections::BTreeMap};

use crate::{Reader, Writer, Error, JsonDeserialize, JsonSerialize};

impl<T: JsonDeserialize> JsonDeserialize for BTreeMap<String, T> {
  /// If a key is duplicated, the last value is kept.
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    let mut res = BTreeMap::new();
    reader.begin_object()?;
    while reader.has_next()? {
      let key = reader.next_name()?;
      res.insert(key, T::deserialize(reader)?);
    }
    reader.end_object()?;
    Ok(res)
  }
}

impl<K: AsRef<str>, T: JsonSerialize> JsonSerialize for BTreeMap<K, T> {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    writer.begin_object()?;
    for (key, value) in self {
      writer.name(key.as_ref())?;
      value.serialize(writer)?;
    }
    Ok(writer.end_object()?)
  }
}

#[test]
fn maps() {
  use crate::{from_slice, to_string};
  let map = from_slice::<BTreeMap<String, Option<u8>>>(br#"{"b": 1, "a": null, "b": 2}"#).unwrap();
  assert_eq!(map.len(), 2);
  assert_eq!(map["b"], Some(2));
  assert_eq!(to_string(&map).unwrap(), r#"{"b":2}"#);
}

use crate::{Reader, Writer, JsonError, Error, JsonDeserialize, JsonSerialize};

impl JsonDeserialize for bool {
  fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
    Ok(reader.next_bool()?)
  }
}
impl JsonSerialize for bool {
  fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
    Ok(writer.value_bool(*self)?)
  }
}

macro_rules! signed {
  ($($ty: ty),*) => {
    $(
      impl JsonDeserialize for $ty {
        fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
          let offset = reader.offset();
          <$ty>::try_from(reader.next_i64()?)
            .map_err(|_| Error::Json(JsonError::NumberOutOfRange(offset)))
        }
      }
      impl JsonSerialize for $ty {
        fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
          Ok(writer.value_i64(i64::from(*self))?)
        }
      }
    )*
  };
}
signed!(i8, i16, i32, i64);

macro_rules! unsigned {
  ($($ty: ty),*) => {
    $(
      impl JsonDeserialize for $ty {
        fn deserialize(reader: &mut Reader<'_>) -> Result<Self, Error> {
          let offset = reader.offset();
          <$ty>::try_from(reader.next_u64()?)
            .map_err(|_| Error::Json(JsonError::NumberOutOfRange(offset)))
        }
      }
      impl JsonSerialize for $ty {
        fn serialize(&self, writer: &mut Writer) -> Result<(), Error> {
          Ok(writer.value_u64(u64::from(*self))?)
        }
      }
    )*
  };
}
unsigned!(u8, u16, u32, u64);

#[cfg(test)]
mod tests {
  use crate::*;

  #[test]
  fn integers() {
    assert_eq!(from_slice::<i8>(b"-128").unwrap(), i8::MIN);
    assert!(matches!(from_slice::<i8>(b"128"), Err(Error::Json(JsonError::NumberOutOfRange(0)))));
    assert_eq!(from_slice::<u16>(b"65535").unwrap(), u16::MAX);
    assert!(from_slice::<u16>(b"-1").is_err());
    assert_eq!(from_slice::<i32>(b"2.0").unwrap(), 2);
    assert!(from_slice::<i32>(b"2.5").is_err());
    assert_eq!(from_slice::<u64>(b"18446744073709551615").unwrap(), u64::MAX);
    assert_eq!(to_string(&-5i16).unwrap(), "-5");
    assert_eq!(to_string(&u64::MAX).unwrap(), "18446744073709551615");
    assert!(from_slice::<bool>(b"1").is_err());
    assert_eq!(to_string(&false).unwrap(), "false");
  }
}

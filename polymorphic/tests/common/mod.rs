#![allow(dead_code)]

use core::any::Any;

pub use tagged_json_traits::{
  Type, Value, Reader, Writer, JsonError, Error, Polymorphic, TypeKey, Codec, SubtypeCodec, Codecs, CodecFactory, Request,
};
use tagged_json_derive::{JsonDeserialize, JsonSerialize, Polymorphic};
pub use tagged_json_polymorphic::*;

pub trait Message: Polymorphic {}

#[derive(Clone, PartialEq, Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
pub struct Success {
  pub value: String,
}

#[derive(Clone, PartialEq, Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
pub struct Failure {
  pub code: i64,
  pub reason: Option<String>,
}

// Never registered
#[derive(Clone, PartialEq, Default, Debug, Polymorphic)]
pub struct Unknown;

macro_rules! message {
  ($($ty: ident),*) => {
    $(
      impl Message for $ty {}
      impl From<$ty> for Box<dyn Message> {
        fn from(message: $ty) -> Self {
          Box::new(message)
        }
      }
    )*
  };
}
message!(Success, Failure, Unknown);

pub fn downcast<S: 'static>(message: &dyn Message) -> Option<&S> {
  message.as_any().downcast_ref()
}

pub fn message_codecs() -> Codecs<Box<dyn Message>> {
  Codecs::new().with_subtype::<Success>().with_subtype::<Failure>()
}

pub fn message_registry() -> SubtypeRegistry<Box<dyn Message>, String> {
  SubtypeRegistry::<Box<dyn Message>, String>::new("type")
    .unwrap()
    .with_subtype::<Success>("success")
    .unwrap()
    .with_subtype::<Failure>("error")
    .unwrap()
}

/// A family represented by an `enum`, with the label also modeled as a field.
#[derive(Clone, PartialEq, Debug)]
pub enum IntBase {
  Data(Data),
  Data2(Data2),
}

#[derive(Clone, PartialEq, Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
pub struct Data {
  pub r#type: i32,
  pub data: i32,
}

#[derive(Clone, PartialEq, Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
pub struct Data2 {
  pub r#type: i32,
  pub data2: bool,
}

impl Polymorphic for IntBase {
  fn as_any(&self) -> &dyn Any {
    match self {
      IntBase::Data(data) => data,
      IntBase::Data2(data) => data,
    }
  }
  fn type_name(&self) -> &'static str {
    match self {
      IntBase::Data(data) => data.type_name(),
      IntBase::Data2(data) => data.type_name(),
    }
  }
}
impl From<Data> for IntBase {
  fn from(data: Data) -> Self {
    IntBase::Data(data)
  }
}
impl From<Data2> for IntBase {
  fn from(data: Data2) -> Self {
    IntBase::Data2(data)
  }
}

pub fn int_codecs() -> Codecs<IntBase> {
  Codecs::new().with_subtype::<Data>().with_subtype::<Data2>()
}

/// Decode an entire document.
pub fn decode<T>(codec: &dyn Codec<T>, json: &str) -> Result<T, Error> {
  let mut reader = Reader::new(json.as_bytes());
  let result = codec.decode(&mut reader)?;
  reader.finish()?;
  Ok(result)
}

/// Encode a value as an entire document.
pub fn encode<T>(codec: &dyn Codec<T>, value: &T) -> Result<String, Error> {
  let mut writer = Writer::new();
  codec.encode(value, &mut writer)?;
  Ok(writer.finish()?)
}

/// The polymorphic error within a host error.
pub fn decode_error(error: &Error) -> &DecodeError {
  let Error::Decode(error) = error else { panic!("not a decode error: {error:?}") };
  error.downcast_ref().expect("decode error wasn't from the polymorphic codec")
}

/// The polymorphic error within a host error.
pub fn encode_error(error: &Error) -> &EncodeError {
  let Error::Encode(error) = error else { panic!("not an encode error: {error:?}") };
  error.downcast_ref().expect("encode error wasn't from the polymorphic codec")
}

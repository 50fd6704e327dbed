use std::sync::Arc;

use rand_core::{RngCore, OsRng};
use serde::{Serialize, Deserialize};

use tagged_json_traits::{Reader, Writer, Polymorphic, Codec, Codecs};
use tagged_json_derive::{JsonDeserialize, JsonSerialize, Polymorphic};
use tagged_json_polymorphic::{SubtypeRegistry, PolymorphicCodec};

use crate::tests::random_string;

/// The family as `serde` represents it.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum SerdeMessage {
  #[serde(rename = "success")]
  Success { value: String },
  #[serde(rename = "error")]
  Failure {
    code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
  },
}

trait Message: Polymorphic {}

#[derive(Clone, PartialEq, Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
struct Success {
  value: String,
}
impl Message for Success {}
impl From<Success> for Box<dyn Message> {
  fn from(success: Success) -> Self {
    Box::new(success)
  }
}

#[derive(Clone, PartialEq, Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
struct Failure {
  code: i64,
  reason: Option<String>,
}
impl Message for Failure {}
impl From<Failure> for Box<dyn Message> {
  fn from(failure: Failure) -> Self {
    Box::new(failure)
  }
}

fn codec() -> PolymorphicCodec<Box<dyn Message>, String> {
  SubtypeRegistry::<Box<dyn Message>, String>::new("type")
    .unwrap()
    .with_subtype::<Success>("success")
    .unwrap()
    .with_subtype::<Failure>("error")
    .unwrap()
    .resolve(&Codecs::new().with_subtype::<Success>().with_subtype::<Failure>())
    .unwrap()
}

#[allow(clippy::cast_possible_wrap)]
fn random_message() -> SerdeMessage {
  if (OsRng.next_u64() % 2) == 1 {
    SerdeMessage::Success { value: random_string() }
  } else {
    SerdeMessage::Failure {
      code: OsRng.next_u64() as i64,
      reason: ((OsRng.next_u64() % 2) == 1).then(random_string),
    }
  }
}

fn ours(message: &SerdeMessage) -> Box<dyn Message> {
  match message.clone() {
    SerdeMessage::Success { value } => Success { value }.into(),
    SerdeMessage::Failure { code, reason } => Failure { code, reason }.into(),
  }
}

fn theirs(message: &dyn Message) -> SerdeMessage {
  if let Some(Success { value }) = message.as_any().downcast_ref() {
    return SerdeMessage::Success { value: value.clone() };
  }
  let Some(Failure { code, reason }) = message.as_any().downcast_ref() else {
    panic!("decoded an unexpected subtype")
  };
  SerdeMessage::Failure { code: *code, reason: reason.clone() }
}

fn decode(codec: &PolymorphicCodec<Box<dyn Message>, String>, json: &str) -> Box<dyn Message> {
  let mut reader = Reader::new(json.as_bytes());
  let message = codec.decode(&mut reader).unwrap();
  reader.finish().unwrap();
  message
}

/// Every serialization of the message, with the label at each position within the object.
fn label_positions(message: &SerdeMessage) -> Vec<String> {
  let serde_json::Value::Object(object) = serde_json::to_value(message).unwrap() else {
    panic!("message wasn't serialized as an object")
  };
  let label = serde_json::to_string(&object["type"]).unwrap();
  let fields = object
    .iter()
    .filter(|(key, _)| key.as_str() != "type")
    .map(|(key, value)| {
      format!("{}:{}", serde_json::to_string(key).unwrap(), serde_json::to_string(value).unwrap())
    })
    .collect::<Vec<_>>();

  let mut serializations = vec![];
  for i in 0 ..= fields.len() {
    let mut fields = fields.clone();
    fields.insert(i, format!("\"type\":{label}"));
    serializations.push(format!("{{{}}}", fields.join(",")));
  }
  serializations
}

#[test]
fn agrees_with_serde() {
  let codec = codec();
  for _ in 0 .. 100 {
    let message = random_message();

    let mut writer = Writer::new();
    codec.encode(&ours(&message), &mut writer).unwrap();
    let encoded = writer.finish().unwrap();
    assert_eq!(encoded, serde_json::to_string(&message).unwrap());
    assert_eq!(serde_json::from_str::<SerdeMessage>(&encoded).unwrap(), message);

    for json in label_positions(&message) {
      assert_eq!(serde_json::from_str::<SerdeMessage>(&json).unwrap(), message);
      assert_eq!(theirs(&*decode(&codec, &json)), message);
    }
  }
}

#[test]
fn rejects_with_serde() {
  let codec = codec();
  for json in [
    r#"{"value":"a"}"#,
    r#"{"type":"other","value":"a"}"#,
    r#"{"type":null,"value":"a"}"#,
    r#"{"type":1,"value":"a"}"#,
    r#""success""#,
  ] {
    assert!(serde_json::from_str::<SerdeMessage>(json).is_err(), "{json}");
    let mut reader = Reader::new(json.as_bytes());
    assert!(codec.decode(&mut reader).is_err(), "{json}");
  }
}

#[test]
fn as_codec() {
  let codec: Arc<dyn Codec<Box<dyn Message>>> = Arc::new(codec());
  let message = random_message();
  let mut writer = Writer::new();
  codec.encode(&ours(&message), &mut writer).unwrap();
  let encoded = writer.finish().unwrap();

  let mut reader = Reader::new(encoded.as_bytes());
  assert_eq!(theirs(&*codec.decode(&mut reader).unwrap()), message);
  reader.finish().unwrap();
}

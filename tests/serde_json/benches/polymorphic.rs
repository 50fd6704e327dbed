use rand_core::{RngCore, OsRng};
use serde::{Serialize, Deserialize};

use tagged_json_traits::{Reader, Writer, Polymorphic, Codecs};
use tagged_json_derive::{JsonDeserialize, JsonSerialize, Polymorphic};
use tagged_json_polymorphic::SubtypeRegistry;

#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum SerdeMessage {
  #[serde(rename = "success")]
  Success { value: String },
  #[serde(rename = "error")]
  Failure { code: i64, reason: String },
}

trait Message: Polymorphic {}

#[derive(Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
struct Success {
  value: String,
}
impl Message for Success {}
impl From<Success> for Box<dyn Message> {
  fn from(success: Success) -> Self {
    Box::new(success)
  }
}

#[derive(Default, Debug, JsonDeserialize, JsonSerialize, Polymorphic)]
struct Failure {
  code: i64,
  reason: String,
}
impl Message for Failure {}
impl From<Failure> for Box<dyn Message> {
  fn from(failure: Failure) -> Self {
    Box::new(failure)
  }
}

const MESSAGES: usize = 4 * 1024 * 1024;

#[allow(clippy::cast_possible_wrap)]
fn main() {
  let codec = SubtypeRegistry::<Box<dyn Message>, String>::new("type")
    .unwrap()
    .with_subtype::<Success>("success")
    .unwrap()
    .with_subtype::<Failure>("error")
    .unwrap()
    .resolve(&Codecs::<Box<dyn Message>>::new().with_subtype::<Success>().with_subtype::<Failure>())
    .unwrap();

  // Generate messages which will be ~200 MB once serialized
  let mut theirs = Vec::with_capacity(MESSAGES);
  let mut ours = Vec::<Box<dyn Message>>::with_capacity(MESSAGES);
  while theirs.len() < MESSAGES {
    let bits = OsRng.next_u64();
    if (bits % 2) == 1 {
      let value = format!("{bits:x}");
      theirs.push(SerdeMessage::Success { value: value.clone() });
      ours.push(Success { value }.into());
    } else {
      let reason = "not found".to_string();
      theirs.push(SerdeMessage::Failure { code: bits as i64, reason: reason.clone() });
      ours.push(Failure { code: bits as i64, reason }.into());
    }
  }

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(serde_json::to_string(&theirs).unwrap());
    println!(
      "serde_json took {}ms to serialize {MESSAGES} internally-tagged messages",
      start.elapsed().as_millis()
    );
  }

  let serialization = {
    let start = std::time::Instant::now();
    let mut writer = Writer::new();
    writer.begin_array().unwrap();
    for message in &ours {
      codec.encode(message, &mut writer).unwrap();
    }
    writer.end_array().unwrap();
    let serialization = core::hint::black_box(writer.finish().unwrap());
    println!(
      "tagged-json-polymorphic took {}ms to serialize {MESSAGES} messages",
      start.elapsed().as_millis()
    );
    serialization
  };

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(
      serde_json::from_str::<Vec<SerdeMessage>>(&serialization).unwrap(),
    );
    println!(
      "serde_json took {}ms to deserialize {MESSAGES} internally-tagged messages",
      start.elapsed().as_millis()
    );
  }

  {
    let start = std::time::Instant::now();
    let mut reader = Reader::new(serialization.as_bytes());
    reader.begin_array().unwrap();
    let mut messages = Vec::with_capacity(MESSAGES);
    while reader.has_next().unwrap() {
      messages.push(codec.decode(&mut reader).unwrap());
    }
    reader.end_array().unwrap();
    reader.finish().unwrap();
    let _ = core::hint::black_box(messages);
    println!(
      "tagged-json-polymorphic took {}ms to deserialize {MESSAGES} messages",
      start.elapsed().as_millis()
    );
  }

  // Sort the keys of each object, moving the label after the fields of failures
  let relabeled = serde_json::to_string(
    &serde_json::from_str::<Vec<serde_json::Value>>(&serialization).unwrap(),
  )
  .unwrap();

  {
    let start = std::time::Instant::now();
    let mut reader = Reader::new(relabeled.as_bytes());
    reader.begin_array().unwrap();
    while reader.has_next().unwrap() {
      let _ = core::hint::black_box(codec.decode(&mut reader).unwrap());
    }
    reader.end_array().unwrap();
    println!(
      "tagged-json-polymorphic took {}ms to deserialize {MESSAGES} messages with sorted keys",
      start.elapsed().as_millis()
    );
  }
}

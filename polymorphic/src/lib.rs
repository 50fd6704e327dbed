#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod label;
mod error;
mod registry;
mod codec;

pub use label::{LabelKind, Label};
pub use error::{ConfigurationError, DecodeError, EncodeError};
pub use registry::SubtypeRegistry;
pub use codec::PolymorphicCodec;

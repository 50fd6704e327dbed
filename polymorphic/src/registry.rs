use core::fmt;
use alloc::{format, string::{String, ToString}, vec::Vec, sync::Arc};

use log::debug;

use tagged_json_traits::{
  Reader, Writer, Error, Polymorphic, TypeKey, Codec, Codecs, CodecFactory, Request,
};

use crate::{Label, LabelKind, ConfigurationError, EncodeError, PolymorphicCodec, codec::join};

/// The configuration of a polymorphic family.
///
/// This maps the labels which may appear under the label key to the concrete types (subtypes) of
/// the family `T`, whose values are labeled with `V`s.
///
/// The registry is immutable. Each `with_*` method returns a new registry, leaving the receiver
/// untouched (and usable, even if the method failed).
///
/// The registry is resolved into a [`PolymorphicCodec`] using the codecs for each subtype, either
/// directly with [`SubtypeRegistry::resolve`] or by adding it to a [`Codecs`] as a
/// [`CodecFactory`].
pub struct SubtypeRegistry<T, V> {
  label_key: String,
  labels: Vec<V>,
  subtypes: Vec<TypeKey>,
  fallback: Option<Fallback<T>>,
}

/// The fallback of a registry.
///
/// A default is only turned into a codec once resolved, as its error lists every subtype.
enum Fallback<T> {
  Codec(Arc<dyn Codec<T>>),
  Default(Arc<dyn Send + Sync + Fn() -> T>),
}

impl<T> Clone for Fallback<T> {
  fn clone(&self) -> Self {
    match self {
      Fallback::Codec(codec) => Fallback::Codec(codec.clone()),
      Fallback::Default(default) => Fallback::Default(default.clone()),
    }
  }
}

impl<T, V: Clone> Clone for SubtypeRegistry<T, V> {
  fn clone(&self) -> Self {
    SubtypeRegistry {
      label_key: self.label_key.clone(),
      labels: self.labels.clone(),
      subtypes: self.subtypes.clone(),
      fallback: self.fallback.clone(),
    }
  }
}

impl<T, V: fmt::Debug> fmt::Debug for SubtypeRegistry<T, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SubtypeRegistry")
      .field("base_type", &core::any::type_name::<T>())
      .field("label_key", &self.label_key)
      .field("labels", &self.labels)
      .field("subtypes", &self.subtypes.iter().map(TypeKey::name).collect::<Vec<_>>())
      .field("fallback", &self.fallback.is_some())
      .finish()
  }
}

impl<T: Polymorphic, V: Label> SubtypeRegistry<T, V> {
  /// Create a registry without any subtypes, whose labels are under the key `label_key`.
  pub fn new(label_key: impl Into<String>) -> Result<Self, ConfigurationError> {
    let label_key = label_key.into();
    if label_key.is_empty() {
      Err(ConfigurationError::EmptyLabelKey)?;
    }
    Ok(SubtypeRegistry { label_key, labels: Vec::new(), subtypes: Vec::new(), fallback: None })
  }

  /// Register the subtype `S` with the label `label`.
  pub fn with_subtype<S: 'static>(&self, label: impl Into<V>) -> Result<Self, ConfigurationError> {
    self.with_subtype_key(TypeKey::of::<S>(), label)
  }

  /// Register the subtype identified by `subtype` with the label `label`.
  ///
  /// The label must not already be registered. A subtype may be registered under multiple
  /// labels, in which case values of it are encoded with the label registered first.
  pub fn with_subtype_key(
    &self,
    subtype: TypeKey,
    label: impl Into<V>,
  ) -> Result<Self, ConfigurationError> {
    let label = label.into();
    if !label.is_valid() {
      Err(ConfigurationError::InvalidLabel { label: label.to_string() })?;
    }
    if self.labels.contains(&label) {
      Err(ConfigurationError::DuplicateLabel { label: label.to_string() })?;
    }
    let mut registry = self.clone();
    registry.labels.push(label);
    registry.subtypes.push(subtype);
    Ok(registry)
  }

  /// Set the codec used for labels which aren't registered, and for values of types which aren't
  /// registered.
  ///
  /// When decoding, the fallback receives the reader positioned at the object, with the label
  /// still present, and must consume the entire object. When encoding, the fallback's output is
  /// flattened into an object without a label.
  ///
  /// `None` clears the fallback.
  pub fn with_fallback_codec(&self, fallback: Option<Arc<dyn Codec<T>>>) -> Self {
    self.with_fallback(fallback.map(Fallback::Codec))
  }

  fn with_fallback(&self, fallback: Option<Fallback<T>>) -> Self {
    SubtypeRegistry {
      label_key: self.label_key.clone(),
      labels: self.labels.clone(),
      subtypes: self.subtypes.clone(),
      fallback,
    }
  }

  /// Decode objects with labels which aren't registered as `value`.
  ///
  /// The fallback this sets refuses to encode.
  pub fn with_default_value(&self, value: T) -> Self
  where
    T: Clone + Send + Sync,
  {
    self.with_default_fn(move || value.clone())
  }

  /// Decode objects with labels which aren't registered as the result of `default`.
  ///
  /// This allows defaulting to values which aren't `Clone`, such as a `Box<dyn Trait>`. The
  /// fallback this sets refuses to encode.
  pub fn with_default_fn(&self, default: impl 'static + Send + Sync + Fn() -> T) -> Self {
    self.with_fallback(Some(Fallback::Default(Arc::new(default))))
  }

  /// The base type of the polymorphic family.
  pub fn base_type(&self) -> TypeKey {
    TypeKey::of::<T>()
  }

  /// The key of the field holding the label.
  pub fn label_key(&self) -> &str {
    &self.label_key
  }

  /// The kind of the labels.
  pub fn label_kind(&self) -> LabelKind {
    V::KIND
  }

  /// The registered labels, in the order they were registered.
  pub fn labels(&self) -> &[V] {
    &self.labels
  }

  /// The registered subtypes, in the order they were registered, corresponding to the labels.
  pub fn subtypes(&self) -> &[TypeKey] {
    &self.subtypes
  }

  /// If a fallback is set.
  pub fn has_fallback(&self) -> bool {
    self.fallback.is_some()
  }

  /// Resolve this registry into a codec, using the codecs for each subtype from `codecs`.
  ///
  /// The codec for each subtype is obtained from `codecs` once, now.
  pub fn resolve(&self, codecs: &Codecs<T>) -> Result<PolymorphicCodec<T, V>, ConfigurationError> {
    let subtype_codecs = self
      .subtypes
      .iter()
      .map(|subtype| {
        codecs.codec(&Request { target: *subtype, annotations: &[] }).map_err(|error| match error {
          Error::MissingCodec { .. } => {
            ConfigurationError::MissingCodec { subtype: subtype.name() }
          }
          error => ConfigurationError::Subtype { subtype: subtype.name(), error },
        })
      })
      .collect::<Result<Vec<_>, _>>()?;
    let fallback = self.fallback.as_ref().map(|fallback| match fallback {
      Fallback::Codec(codec) => codec.clone(),
      Fallback::Default(default) => Arc::new(DefaultValueCodec {
        default: default.clone(),
        subtypes: self.subtypes.clone(),
      }) as Arc<dyn Codec<T>>,
    });
    Ok(PolymorphicCodec::new(
      self.label_key.clone(),
      self.labels.clone(),
      self.subtypes.clone(),
      subtype_codecs,
      fallback,
    ))
  }
}

impl<T: Polymorphic, V: Label> CodecFactory<T> for SubtypeRegistry<T, V> {
  /// This is only applicable to unannotated requests for exactly the base type.
  fn create(
    &self,
    request: &Request<'_>,
    codecs: &Codecs<T>,
  ) -> Option<Result<Arc<dyn Codec<T>>, Error>> {
    if (request.target != self.base_type()) || (!request.annotations.is_empty()) {
      debug!(
        "registry for {} under '{}' isn't applicable to {} with annotations {:?}",
        self.base_type(),
        self.label_key,
        request.target,
        request.annotations,
      );
      None?;
    }
    Some(self.resolve(codecs).map(|codec| Arc::new(codec) as Arc<dyn Codec<T>>).map_err(Into::into))
  }
}

/// The fallback which decodes every value as a default, set by
/// [`SubtypeRegistry::with_default_value`].
struct DefaultValueCodec<T> {
  default: Arc<dyn Send + Sync + Fn() -> T>,
  subtypes: Vec<TypeKey>,
}

impl<T: Polymorphic> Codec<T> for DefaultValueCodec<T> {
  fn decode(&self, reader: &mut Reader<'_>) -> Result<T, Error> {
    // The object is skipped in its entirety, including any fields the reader considers unknown
    let fail_on_unknown = reader.fail_on_unknown();
    reader.set_fail_on_unknown(false);
    let skipped = reader.skip_value();
    reader.set_fail_on_unknown(fail_on_unknown);
    skipped?;
    Ok((self.default)())
  }

  fn encode(&self, value: &T, _: &mut Writer) -> Result<(), Error> {
    Err(
      EncodeError::UnregisteredSubtype {
        expected: join(self.subtypes.iter().map(TypeKey::name)),
        value: format!("{value:?}"),
        type_name: value.type_name(),
      }
      .into(),
    )
  }
}

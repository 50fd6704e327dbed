use core::{
  any::{Any, TypeId},
  fmt,
  marker::PhantomData,
};
use alloc::{boxed::Box, vec::Vec, sync::Arc};

use crate::{Reader, Writer, Error, JsonDeserialize, JsonSerialize};

/// An identifier for a concrete Rust type.
///
/// This is a `TypeId` accompanied by the type's name, for use in messages.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
}

impl TypeKey {
  /// The key for the type `T`.
  pub fn of<T: ?Sized + 'static>() -> Self {
    TypeKey { id: TypeId::of::<T>(), name: core::any::type_name::<T>() }
  }

  /// The `TypeId` of the type.
  pub fn id(&self) -> TypeId {
    self.id
  }

  /// The name of the type.
  pub fn name(&self) -> &'static str {
    self.name
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}
impl Eq for TypeKey {}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

/// A value whose concrete type may be discovered at runtime.
///
/// This is implemented by the concrete types of a polymorphic family, and by the family's
/// representation (such as a `Box<dyn Trait>` or an `enum` wrapping each concrete type) to
/// expose the concrete value within.
pub trait Polymorphic: 'static + fmt::Debug {
  /// This value, as its concrete type.
  fn as_any(&self) -> &dyn Any;

  /// The name of this value's concrete type.
  fn type_name(&self) -> &'static str {
    core::any::type_name::<Self>()
  }
}

impl<P: ?Sized + Polymorphic> Polymorphic for Box<P> {
  fn as_any(&self) -> &dyn Any {
    (**self).as_any()
  }
  fn type_name(&self) -> &'static str {
    (**self).type_name()
  }
}

/// A reader and writer of values of type `T`.
///
/// Unlike [`JsonDeserialize`] and [`JsonSerialize`], codecs are objects which may be created at
/// runtime and selected dynamically.
pub trait Codec<T>: Send + Sync {
  /// Decode a value from the next value within the reader.
  fn decode(&self, reader: &mut Reader<'_>) -> Result<T, Error>;
  /// Encode a value as the next value within the writer.
  fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error>;
}

/// The codec for the concrete type `S`, as a member of the polymorphic family `T`.
///
/// This decodes an `S` and converts it into a `T`. When encoding, the `T` must contain an `S`.
pub struct SubtypeCodec<S>(PhantomData<fn() -> S>);

impl<S> SubtypeCodec<S> {
  /// Create the codec for `S`.
  pub fn new() -> Self {
    SubtypeCodec(PhantomData)
  }
}

impl<S> Default for SubtypeCodec<S> {
  fn default() -> Self {
    Self::new()
  }
}

impl<S> fmt::Debug for SubtypeCodec<S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SubtypeCodec<{}>", core::any::type_name::<S>())
  }
}

impl<T, S> Codec<T> for SubtypeCodec<S>
where
  T: Polymorphic,
  S: Polymorphic + JsonDeserialize + JsonSerialize + Into<T>,
{
  fn decode(&self, reader: &mut Reader<'_>) -> Result<T, Error> {
    S::deserialize(reader).map(Into::into)
  }
  fn encode(&self, value: &T, writer: &mut Writer) -> Result<(), Error> {
    let Some(concrete) = value.as_any().downcast_ref::<S>() else {
      Err(Error::UnexpectedSubtype {
        expected: core::any::type_name::<S>(),
        found: value.type_name(),
      })?
    };
    concrete.serialize(writer)
  }
}

/// A request for a codec.
#[derive(Clone, Copy, Debug)]
pub struct Request<'annotations> {
  /// The type a codec is requested for.
  pub target: TypeKey,
  /// Annotations qualifying the request.
  ///
  /// A factory may only be applicable to unannotated requests.
  pub annotations: &'annotations [&'annotations str],
}

impl Request<'static> {
  /// An unannotated request for the type `T`.
  pub fn of<T: ?Sized + 'static>() -> Self {
    Request { target: TypeKey::of::<T>(), annotations: &[] }
  }
}

impl<'annotations> Request<'annotations> {
  /// This request, qualified with annotations.
  pub fn with_annotations(
    self,
    annotations: &'annotations [&'annotations str],
  ) -> Request<'annotations> {
    Request { target: self.target, annotations }
  }
}

/// A provider of codecs, consulted by [`Codecs::codec`].
pub trait CodecFactory<T>: Send + Sync {
  /// Create a codec for the request.
  ///
  /// This returns `None` if this factory isn't applicable to the request, allowing the next
  /// factory to be consulted. The collection of codecs is provided so the created codec may
  /// itself use codecs from it.
  fn create(
    &self,
    request: &Request<'_>,
    codecs: &Codecs<T>,
  ) -> Option<Result<Arc<dyn Codec<T>>, Error>>;
}

/// A collection of codecs for the polymorphic family `T`, keyed by concrete type.
pub struct Codecs<T> {
  codecs: Vec<(TypeKey, Arc<dyn Codec<T>>)>,
  factories: Vec<Arc<dyn CodecFactory<T>>>,
}

impl<T> Clone for Codecs<T> {
  fn clone(&self) -> Self {
    Codecs { codecs: self.codecs.clone(), factories: self.factories.clone() }
  }
}

impl<T> fmt::Debug for Codecs<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Codecs")
      .field("codecs", &self.codecs.iter().map(|(key, _)| key.name()).collect::<Vec<_>>())
      .field("factories", &self.factories.len())
      .finish()
  }
}

impl<T> Default for Codecs<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Codecs<T> {
  /// Create an empty collection.
  pub fn new() -> Self {
    Codecs { codecs: Vec::new(), factories: Vec::new() }
  }

  /// Add the codec for a concrete type, replacing any existing codec for it.
  pub fn with_codec(mut self, key: TypeKey, codec: Arc<dyn Codec<T>>) -> Self {
    match self.codecs.iter_mut().find(|(existing, _)| *existing == key) {
      Some(entry) => entry.1 = codec,
      None => self.codecs.push((key, codec)),
    }
    self
  }

  /// Add the [`SubtypeCodec`] for `S`.
  pub fn with_subtype<S: 'static>(self) -> Self
  where
    SubtypeCodec<S>: Codec<T>,
  {
    self.with_codec(TypeKey::of::<S>(), Arc::new(SubtypeCodec::<S>::new()))
  }

  /// Add a factory.
  ///
  /// Factories are consulted in the order they were added.
  pub fn with_factory(mut self, factory: Arc<dyn CodecFactory<T>>) -> Self {
    self.factories.push(factory);
    self
  }

  /// The codec for exactly this type, if one was added.
  pub fn codec_for(&self, key: TypeKey) -> Option<Arc<dyn Codec<T>>> {
    self.codecs.iter().find(|(existing, _)| *existing == key).map(|(_, codec)| codec.clone())
  }

  /// The codec for a request.
  ///
  /// Each factory is consulted, in order, with the first applicable factory's result returned.
  /// If no factory is applicable, the codec for exactly the requested type is returned.
  pub fn codec(&self, request: &Request<'_>) -> Result<Arc<dyn Codec<T>>, Error> {
    for factory in &self.factories {
      if let Some(codec) = factory.create(request, self) {
        return codec;
      }
    }
    self.codec_for(request.target).ok_or(Error::MissingCodec { type_name: request.target.name() })
  }
}

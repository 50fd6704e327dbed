#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![no_std]

use core::{borrow::Borrow, str::FromStr, iter::Peekable};

extern crate alloc;
use alloc::{
  vec,
  vec::Vec,
  string::{String, ToString},
  format,
};

extern crate proc_macro;
use proc_macro::{Delimiter, Spacing, Punct, Group, TokenTree, TokenStream};

// `<` will not open a group, so we use this to take all items within a `< ... >` expression.
fn take_angle_expression(
  iter: &mut Peekable<impl Iterator<Item: Borrow<TokenTree>>>,
) -> TokenStream {
  {
    let Some(peeked) = iter.peek() else { return TokenStream::default() };
    let TokenTree::Punct(punct) = peeked.borrow() else { return TokenStream::default() };
    if punct.as_char() != '<' {
      return TokenStream::default();
    }
  }

  let mut result = vec![];
  let mut count = 0;
  loop {
    let item = iter.next().expect("`TokenTree` unexpectedly terminated when taking `< ... >`");
    result.push(item.borrow().clone());
    if let TokenTree::Punct(punct) = item.borrow() {
      let punct = punct.as_char();
      if punct == '<' {
        count += 1;
      }
      if punct == '>' {
        count -= 1;
      }
      if count == 0 {
        break;
      }
    }
  }
  TokenStream::from_iter(result)
}

// Advance the iterator past the next `,` on this depth, if there is one.
fn skip_comma_delimited(iter: &mut Peekable<impl Iterator<Item: Borrow<TokenTree>>>) {
  loop {
    take_angle_expression(iter);
    let Some(item) = iter.next() else { return };
    if let TokenTree::Punct(punct) = item.borrow() {
      if punct.as_char() == ',' {
        return;
      }
    }
  }
}

struct Header {
  generic_bounds: String,
  generics: String,
  name: String,
}

// Parse the attributes, visibility, keyword, name, and generics of a type definition.
//
// This is somewhat comparable to `syn::Generics`, especially its `split_for_impl` method.
fn parse_header(
  object: &mut Peekable<impl Iterator<Item = TokenTree>>,
  derive: &str,
  keywords: &[&str],
) -> Header {
  loop {
    match object.next() {
      Some(TokenTree::Punct(punct)) if punct.as_char() == '#' => {
        let TokenTree::Group(_) = object.next().expect("`#` but no `[ ... ]`") else {
          panic!("`#` not followed by a `TokenTree::Group` for its `[ ... ]`")
        };
      }
      // `pub`, with an optional `( ... )` following
      Some(TokenTree::Ident(ident)) if ident.to_string() == "pub" => {
        if let Some(TokenTree::Group(group)) = object.peek() {
          if group.delimiter() == Delimiter::Parenthesis {
            let _ = object.next().expect("peeked but not present");
          }
        }
      }
      Some(TokenTree::Ident(ident)) if keywords.contains(&ident.to_string().as_str()) => break,
      _ => panic!("`{derive}` wasn't applied to one of {keywords:?}"),
    }
  }
  let name = match object.next() {
    Some(TokenTree::Ident(ident)) => ident.to_string(),
    _ => panic!("`{derive}` wasn't applied to an item with a name"),
  };

  let generic_bounds_tree = take_angle_expression(object);

  let mut generics_tree = vec![];
  {
    let mut iter = generic_bounds_tree.clone().into_iter().peekable();
    while let Some(component) = iter.next() {
      // Take until the next colon, used to mark trait bounds
      if let TokenTree::Punct(punct) = &component {
        if punct.as_char() == ':' {
          // Skip the actual bounds
          skip_comma_delimited(&mut iter);
          // Add our own comma delimiter and move to the next item
          generics_tree.push(TokenTree::Punct(Punct::new(',', Spacing::Alone)));
          continue;
        }
      }
      // Push this component as it isn't part of the bounds
      generics_tree.push(component);
    }
  }
  // Ensure this is terminated, which it won't be if the last item had bounds yet didn't have a
  // trailing comma
  if let Some(last) = generics_tree.last() {
    match last {
      TokenTree::Punct(punct) if punct.as_char() == '>' => {}
      _ => generics_tree.push(TokenTree::Punct(Punct::new('>', Spacing::Alone))),
    }
  }

  let generic_bounds = generic_bounds_tree.to_string();
  let generics = TokenStream::from_iter(generics_tree).to_string();

  Header { generic_bounds, generics, name }
}

/// A field of a `struct`, with the key it's (de)serialized under.
struct Field {
  name: String,
  key: String,
}

struct Struct {
  header: Header,
  fields: Vec<Field>,
}

/// An attribute on a field which modifies how it's (de)serialized.
enum FieldAttribute {
  Key(String),
  Skip,
}

// Interpret the `[ ... ]` following a `#`, if it's one of our attributes.
fn field_attribute(attribute: &Group) -> Option<FieldAttribute> {
  if attribute.delimiter() != Delimiter::Bracket {
    None?;
  }
  let mut attribute = attribute.stream().into_iter();
  let TokenTree::Ident(name) = attribute.next()? else { None? };
  match name.to_string().as_str() {
    "skip" => Some(FieldAttribute::Skip),
    "key" => {
      let Some(TokenTree::Group(arguments)) = attribute.next() else {
        panic!("`key` attribute not followed by `(\"key\")`")
      };
      assert_eq!(
        arguments.delimiter(),
        Delimiter::Parenthesis,
        "`key` attribute's arguments weren't within parentheses"
      );
      let arguments = arguments.stream().into_iter().collect::<Vec<_>>();
      let [TokenTree::Literal(key)] = arguments.as_slice() else {
        panic!("`key` attribute didn't have exactly one literal argument")
      };
      let key = key.to_string();
      let Some(key) = key.strip_prefix('"').and_then(|key| key.strip_suffix('"')) else {
        panic!("`key` attribute's argument wasn't a string literal")
      };
      assert!(!key.contains('\\'), "`key` attribute's argument contained an escape");
      Some(FieldAttribute::Key(key.to_string()))
    }
    _ => None,
  }
}

fn parse_struct(object: TokenStream, derive: &str) -> Struct {
  let mut object = object.into_iter().peekable();
  let header = parse_header(&mut object, derive, &["struct"]);

  // `where` clauses aren't supported
  let Some(TokenTree::Group(body)) = object.next() else {
    panic!("`struct`'s name was not followed by its body");
  };
  if body.delimiter() != Delimiter::Brace {
    panic!("`{derive}` only supports `struct`s with named fields");
  }

  let mut fields = vec![];
  let mut body = body.stream().into_iter().peekable();
  while body.peek().is_some() {
    let mut key = None;
    let mut skip = false;
    let name = loop {
      match body.next().expect("couldn't find the name of the field within the `struct`") {
        TokenTree::Group(group) => match field_attribute(&group) {
          Some(FieldAttribute::Key(renamed)) => key = Some(renamed),
          Some(FieldAttribute::Skip) => skip = true,
          None => {}
        },
        // The field's visibility
        TokenTree::Ident(ident) if ident.to_string() == "pub" => {}
        TokenTree::Ident(ident) => break ident.to_string(),
        _ => {}
      }
    };

    if !skip {
      let key = key.unwrap_or_else(|| name.trim_start_matches("r#").to_string());
      fields.push(Field { name, key });
    }

    // Advance past the field's type
    skip_comma_delimited(&mut body);
  }

  Struct { header, fields }
}

/// Derive an implementation of the `JsonDeserialize` trait.
///
/// This _requires_ the `struct` derived for implement `Default`. Fields which aren't present in
/// the serialization will be left to their `Default` initialization. If you wish to detect if a
/// field was omitted, please wrap it in `Option`. Fields present in the serialization yet not
/// within the `struct` are skipped, which errors if the reader was set to fail on unknown fields.
///
/// Fields may deserialized from a distinct key using the `key` attribute, accepting a string
/// literal for the key to deserialize from (`key("key")`). Fields may be omitted from
/// deserialization with the `skip` attribute.
///
/// As a procedural macro, this will panic causing a compile-time error on any unexpected input.
#[proc_macro_derive(JsonDeserialize, attributes(key, skip))]
pub fn derive_json_deserialize(object: TokenStream) -> TokenStream {
  let Struct { header: Header { generic_bounds, generics, name }, fields } =
    parse_struct(object, "JsonDeserialize");

  let mut keys = String::new();
  let mut fields_deserialization = String::new();
  for (i, Field { name: field_name, key }) in fields.iter().enumerate() {
    keys.push_str(&format!("{key:?},"));
    fields_deserialization.push_str(&format!(
      r#"
      Some({i}) => {{
        result.{field_name} = tagged_json_traits::JsonDeserialize::deserialize(reader)?
      }}
      "#
    ));
  }

  TokenStream::from_str(&format!(
    r#"
    impl{generic_bounds} tagged_json_traits::JsonDeserialize for {name}{generics}
      where Self: core::default::Default {{
      fn deserialize(
        reader: &mut tagged_json_traits::Reader<'_>,
      ) -> Result<Self, tagged_json_traits::Error> {{
        #[allow(unused_mut)]
        let mut result = <Self as core::default::Default>::default();
        reader.begin_object()?;
        while reader.has_next()? {{
          match reader.select_name(&[{keys}])? {{
            {fields_deserialization}
            // Skip unknown fields
            _ => {{
              reader.skip_name()?;
              reader.skip_value()?;
            }}
          }}
        }}
        reader.end_object()?;
        Ok(result)
      }}
    }}
    "#
  ))
  .expect("typo in implementation of `JsonDeserialize`")
}

/// Derive an implementation of the `JsonSerialize` trait.
///
/// Fields may serialized with a distinct name using the `key` attribute, accepting a string
/// literal for the key to serialize as (`key("key")`). Fields may be omitted from serialization
/// with the `skip` attribute. Fields whose value serializes as `null` are omitted unless the
/// writer serializes nulls.
///
/// As a procedural macro, this will panic causing a compile-time error on any unexpected input.
#[proc_macro_derive(JsonSerialize, attributes(key, skip))]
pub fn derive_json_serialize(object: TokenStream) -> TokenStream {
  let Struct { header: Header { generic_bounds, generics, name }, fields } =
    parse_struct(object, "JsonSerialize");

  let mut fields_serialization = String::new();
  for Field { name: field_name, key } in &fields {
    fields_serialization.push_str(&format!(
      r#"
      writer.name({key:?})?;
      tagged_json_traits::JsonSerialize::serialize(&self.{field_name}, writer)?;
      "#
    ));
  }

  TokenStream::from_str(&format!(
    r#"
    impl{generic_bounds} tagged_json_traits::JsonSerialize for {name}{generics} {{
      fn serialize(
        &self,
        writer: &mut tagged_json_traits::Writer,
      ) -> Result<(), tagged_json_traits::Error> {{
        writer.begin_object()?;
        {fields_serialization}
        writer.end_object()?;
        Ok(())
      }}
    }}
    "#
  ))
  .expect("typo in implementation of `JsonSerialize`")
}

/// Derive an implementation of the `Polymorphic` trait.
///
/// The value is exposed as itself, making this suitable for the concrete types of a polymorphic
/// family. The type must be `'static` and implement `Debug`.
///
/// As a procedural macro, this will panic causing a compile-time error on any unexpected input.
#[proc_macro_derive(Polymorphic)]
pub fn derive_polymorphic(object: TokenStream) -> TokenStream {
  let Header { generic_bounds, generics, name } =
    parse_header(&mut object.into_iter().peekable(), "Polymorphic", &["struct", "enum"]);

  TokenStream::from_str(&format!(
    r#"
    impl{generic_bounds} tagged_json_traits::Polymorphic for {name}{generics} {{
      fn as_any(&self) -> &dyn core::any::Any {{
        self
      }}
    }}
    "#
  ))
  .expect("typo in implementation of `Polymorphic`")
}

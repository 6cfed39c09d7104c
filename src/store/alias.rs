//! Alias table: on-disk type tags to implementation types.
//!
//! Tags are append-only. Once a tag has been written to disk it must stay
//! loadable, including tags that were published by mistake. The first tag
//! bound to a type is its primary tag and the only one ever written; every
//! other tag for that type is accepted on load only.

use super::Persistent;
use crate::error::RegistryError;
use crate::item::Item;
use crate::registry::TypeKey;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use serde_yaml::value::{Tag, TaggedValue};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;

/// Decodes the untagged body of a config file into an item.
pub type ItemDecoder = fn(Value) -> Result<Box<dyn Item>, serde_yaml::Error>;

fn decode_item<T>(value: Value) -> Result<Box<dyn Item>, serde_yaml::Error>
where
    T: Item + DeserializeOwned,
{
    let item: T = serde_yaml::from_value(value)?;
    Ok(Box::new(item))
}

/// A tag that did not resolve through the alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

/// A bound implementation type.
#[derive(Debug, Clone, Copy)]
struct Binding {
    /// Primary on-disk tag, if the type has any alias at all.
    primary: Option<&'static str>,
    decoder: Option<ItemDecoder>,
}

/// Builder for [`AliasTable`]. Used only during bootstrap.
#[derive(Debug, Default)]
pub struct AliasTableBuilder {
    by_tag: BTreeMap<String, TypeKey>,
    types: HashMap<TypeKey, Binding>,
}

impl AliasTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an item type without giving it a tag; it is written under its
    /// type key.
    pub fn bind_item<T>(&mut self) -> &mut Self
    where
        T: Item + Persistent + DeserializeOwned,
    {
        self.types
            .entry(T::TYPE)
            .or_insert(Binding {
                primary: None,
                decoder: None,
            })
            .decoder = Some(decode_item::<T> as ItemDecoder);
        self
    }

    /// Bind an item type that can be the root of a config file, under `tag`.
    pub fn item<T>(&mut self, tag: &'static str) -> Result<&mut Self, RegistryError>
    where
        T: Item + Persistent + DeserializeOwned,
    {
        self.bind_item::<T>();
        self.add_tag(tag, T::TYPE)
    }

    /// Bind a type that only appears nested inside an item, under `tag`.
    pub fn nested<T: Persistent>(&mut self, tag: &'static str) -> Result<&mut Self, RegistryError> {
        self.types.entry(T::TYPE).or_insert(Binding {
            primary: None,
            decoder: None,
        });
        self.add_tag(tag, T::TYPE)
    }

    /// Add another tag for an already bound type. It is accepted on load but
    /// never becomes the written tag.
    pub fn alias(&mut self, tag: &'static str, key: TypeKey) -> Result<&mut Self, RegistryError> {
        if !self.types.contains_key(&key) {
            return Err(RegistryError::UnboundType {
                tag: tag.to_string(),
                key,
            });
        }
        self.add_tag(tag, key)
    }

    fn add_tag(&mut self, tag: &'static str, key: TypeKey) -> Result<&mut Self, RegistryError> {
        if let Some(existing) = self.by_tag.get(tag) {
            if *existing == key {
                return Ok(self);
            }
            return Err(RegistryError::ConflictingAlias {
                tag: tag.to_string(),
                existing: *existing,
                requested: key,
            });
        }
        self.by_tag.insert(tag.to_string(), key);
        if let Some(binding) = self.types.get_mut(&key) {
            binding.primary.get_or_insert(tag);
        }
        Ok(self)
    }

    pub fn build(self) -> AliasTable {
        AliasTable {
            by_tag: self.by_tag,
            types: self.types,
        }
    }
}

/// Read-only mapping between on-disk tags and implementation types.
#[derive(Debug, Clone)]
pub struct AliasTable {
    by_tag: BTreeMap<String, TypeKey>,
    types: HashMap<TypeKey, Binding>,
}

impl AliasTable {
    pub fn builder() -> AliasTableBuilder {
        AliasTableBuilder::new()
    }

    /// Resolve an on-disk tag. Bound type keys resolve to themselves so that
    /// types without an alias can still be loaded.
    pub fn resolve(&self, tag: &str) -> Option<TypeKey> {
        if let Some(key) = self.by_tag.get(tag) {
            return Some(*key);
        }
        self.types
            .keys()
            .find(|key| key.as_str() == tag)
            .copied()
    }

    /// Tag written on save for `key`.
    pub fn primary_tag(&self, key: TypeKey) -> &'static str {
        self.types
            .get(&key)
            .and_then(|b| b.primary)
            .unwrap_or(key.as_str())
    }

    pub fn decoder(&self, key: TypeKey) -> Option<ItemDecoder> {
        self.types.get(&key).and_then(|b| b.decoder)
    }

    /// All tags, sorted, with the type each resolves to.
    pub fn tags(&self) -> impl Iterator<Item = (&str, TypeKey)> {
        self.by_tag.iter().map(|(tag, key)| (tag.as_str(), *key))
    }

    /// Tags that resolve to `key`, primary tag first.
    pub fn tags_for(&self, key: TypeKey) -> Vec<&str> {
        let primary = self.primary_tag(key);
        let mut tags: Vec<&str> = self
            .tags()
            .filter(|(tag, k)| *k == key && *tag != primary)
            .map(|(tag, _)| tag)
            .collect();
        if self.by_tag.contains_key(primary) {
            tags.insert(0, primary);
        }
        tags
    }

    /// Rewrite every tag in `value` from a type key to its primary tag.
    pub fn encode(&self, value: Value) -> Value {
        let encoded: Result<Value, Infallible> = map_tags(value, &mut |tag| {
            let key = self.types.keys().find(|k| k.as_str() == tag).copied();
            Ok(match key {
                Some(key) => self.primary_tag(key).to_string(),
                None => tag.to_string(),
            })
        });
        match encoded {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Rewrite every tag in `value` from an on-disk tag to a type key.
    pub fn decode(&self, value: Value) -> Result<Value, UnknownTag> {
        map_tags(value, &mut |tag| {
            self.resolve(tag)
                .map(|key| key.as_str().to_string())
                .ok_or_else(|| UnknownTag(tag.to_string()))
        })
    }
}

/// Tag name without the leading `!`.
pub(crate) fn tag_name(tag: &Tag) -> String {
    let text = tag.to_string();
    match text.strip_prefix('!') {
        Some(name) => name.to_string(),
        None => text,
    }
}

fn map_tags<E>(
    value: Value,
    f: &mut impl FnMut(&str) -> Result<String, E>,
) -> Result<Value, E> {
    Ok(match value {
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            let renamed = f(&tag_name(&tag))?;
            Value::Tagged(Box::new(TaggedValue {
                tag: Tag::new(renamed),
                value: map_tags(value, f)?,
            }))
        }
        Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(|v| map_tags(v, f))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(k, v)| Ok((k, map_tags(v, f)?)))
                .collect::<Result<_, E>>()?,
        ),
        other => other,
    })
}

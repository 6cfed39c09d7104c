//! Typed wrapper for nested values that carry their own type tag.

use super::Persistent;
use super::alias::tag_name;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use std::ops::{Deref, DerefMut};

/// A nested value written with a type tag, such as a dependency edge inside
/// a module or an axis inside a matrix project.
///
/// The tag written is the type key; the store rewrites it to the primary
/// alias on save and back on load. Untagged values are accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tagged<T>(pub T);

impl<T> Tagged<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Tagged<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Tagged<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T> From<T> for Tagged<T> {
    fn from(value: T) -> Self {
        Tagged(value)
    }
}

impl<T: Persistent + Serialize> Serialize for Tagged<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_variant("Tagged", 0, T::TYPE.as_str(), &self.0)
    }
}

impl<'de, T: Persistent + DeserializeOwned> Deserialize<'de> for Tagged<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = match Value::deserialize(deserializer)? {
            Value::Tagged(tagged) => {
                let found = tag_name(&tagged.tag);
                if found != T::TYPE.as_str() {
                    return Err(D::Error::custom(format!(
                        "expected a value of type {} but found !{}",
                        T::TYPE,
                        found
                    )));
                }
                tagged.value
            }
            untagged => untagged,
        };
        serde_yaml::from_value(body).map(Tagged).map_err(D::Error::custom)
    }
}

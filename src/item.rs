//! Item model: persisted, named units of configuration such as jobs.
//!
//! An item knows its implementation type, its short name (derived from the
//! directory it is stored in, never from the payload) and its place in the
//! item hierarchy. Concrete types embed an [`ItemCore`] for the runtime-only
//! naming state and implement the rest of [`Item`] through [`impl_item!`].

use crate::registry::TypeKey;
use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Container that items live in.
pub trait ItemGroup: Send + Sync {
    /// Full name of the group; empty for the root.
    fn full_name(&self) -> String;

    /// Directory that holds the child item with the given short name.
    fn root_dir_for(&self, child: &str) -> PathBuf;
}

/// Resolves full item names to live items.
pub trait ItemLookup {
    fn get_item_by_full_name(&self, full_name: &str) -> Option<Arc<dyn Item>>;
}

/// A persisted, named entity such as a job definition.
pub trait Item: Any + Send + Sync + fmt::Debug {
    /// Implementation type of this item.
    fn type_key(&self) -> TypeKey;

    fn core(&self) -> &ItemCore;

    fn core_mut(&mut self) -> &mut ItemCore;

    /// Encode the persistent fields of this item.
    fn to_value(&self) -> Result<serde_yaml::Value, serde_yaml::Error>;

    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Short name, unique within the parent group.
    fn name(&self) -> &str {
        self.core().name()
    }

    /// Slash-separated name from the root group.
    fn full_name(&self) -> &str {
        self.core().full_name()
    }

    /// Directory holding this item's config file.
    fn root_dir(&self) -> &Path {
        self.core().root_dir()
    }

    /// Called exactly once after the item is loaded or created.
    fn on_load(&mut self, parent: &dyn ItemGroup, name: &str) {
        self.core_mut().attach(parent, name);
    }
}

impl dyn Item {
    pub fn downcast_ref<T: Item>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Item>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Runtime naming state shared by every item type. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCore {
    name: String,
    full_name: String,
    root_dir: PathBuf,
}

impl ItemCore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            full_name: name.to_string(),
            root_dir: PathBuf::new(),
        }
    }

    /// Bind this item to its parent group under `name`.
    pub fn attach(&mut self, parent: &dyn ItemGroup, name: &str) {
        let parent_name = parent.full_name();
        self.full_name = if parent_name.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", parent_name, name)
        };
        self.root_dir = parent.root_dir_for(name);
        self.name = name.to_string();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

/// Implement the mechanical parts of [`Item`] for a struct with a `core`
/// field of type [`ItemCore`] that also implements `Persistent` and
/// `Serialize`.
#[macro_export]
macro_rules! impl_item {
    ($ty:ty) => {
        impl $crate::item::Item for $ty {
            fn type_key(&self) -> $crate::registry::TypeKey {
                <$ty as $crate::store::Persistent>::TYPE
            }

            fn core(&self) -> &$crate::item::ItemCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut $crate::item::ItemCore {
                &mut self.core
            }

            fn to_value(&self) -> Result<serde_yaml::Value, serde_yaml::Error> {
                serde_yaml::to_value(self)
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn into_any_arc(
                self: std::sync::Arc<Self>,
            ) -> std::sync::Arc<dyn std::any::Any + Send + Sync> {
                self
            }
        }
    };
}

/// Join the full names of `items` with `", "`.
pub fn to_name_list<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Deref,
    T::Target: Item,
{
    items
        .into_iter()
        .map(|item| item.full_name().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a comma-separated list of full names into live items of type `T`.
///
/// Tokens are trimmed; empty tokens, unknown names and items of another type
/// are skipped without error. Order of the input is preserved.
pub fn from_name_list<T: Item>(lookup: &dyn ItemLookup, list: &str) -> Vec<Arc<T>> {
    let mut result = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let Some(item) = lookup.get_item_by_full_name(token) else {
            debug!("Dropping unknown item '{}' from name list", token);
            continue;
        };
        match item.into_any_arc().downcast::<T>() {
            Ok(item) => result.push(item),
            Err(_) => debug!("Dropping '{}' from name list: unexpected item type", token),
        }
    }
    result
}

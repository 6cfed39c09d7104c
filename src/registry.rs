//! Registry of installed top-level item types.
//!
//! Descriptors are registered once during bootstrap and looked up by the
//! identifier of the implementation type they describe. Registration order is
//! preserved and is part of the contract: it drives presentation order and
//! decides which descriptor wins when an identifier is registered twice.

use crate::error::RegistryError;
use crate::item::Item;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Identity of an implementation type.
///
/// This is what the alias table maps on-disk tags to, and what the registry is
/// queried with. It is also written to disk as-is for types that have no alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(&'static str);

impl TypeKey {
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Metadata and factory for one kind of top-level item.
pub trait TopLevelItemDescriptor: Send + Sync {
    /// Identifier of the item type this descriptor creates.
    fn type_key(&self) -> TypeKey;

    /// Caption shown when a user picks what kind of item to create.
    fn display_name(&self) -> &str;

    /// Create a fresh, unsaved item. Must be deterministic for a given name.
    fn new_instance(&self, name: &str) -> Box<dyn Item>;
}

/// Descriptor backed by a plain factory function.
#[derive(Clone)]
pub struct SimpleDescriptor {
    key: TypeKey,
    display_name: &'static str,
    factory: fn(&str) -> Box<dyn Item>,
}

impl SimpleDescriptor {
    pub const fn new(
        key: TypeKey,
        display_name: &'static str,
        factory: fn(&str) -> Box<dyn Item>,
    ) -> Self {
        Self {
            key,
            display_name,
            factory,
        }
    }
}

impl TopLevelItemDescriptor for SimpleDescriptor {
    fn type_key(&self) -> TypeKey {
        self.key
    }

    fn display_name(&self) -> &str {
        self.display_name
    }

    fn new_instance(&self, name: &str) -> Box<dyn Item> {
        (self.factory)(name)
    }
}

impl fmt::Debug for SimpleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleDescriptor")
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Ordered list of all installed top-level item types.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    descriptors: Vec<Arc<dyn TopLevelItemDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor. Duplicate identifiers are accepted; the first one
    /// registered is the one lookups return.
    pub fn register(
        &mut self,
        descriptor: impl TopLevelItemDescriptor + 'static,
    ) -> Result<&mut Self, RegistryError> {
        if descriptor.display_name().trim().is_empty() {
            return Err(RegistryError::EmptyDisplayName {
                key: descriptor.type_key(),
            });
        }
        debug!(
            "Registering item type {} ({})",
            descriptor.type_key(),
            descriptor.display_name()
        );
        self.descriptors.push(Arc::new(descriptor));
        Ok(self)
    }

    /// Find the first descriptor whose type identifier equals `identifier`.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&Arc<dyn TopLevelItemDescriptor>> {
        self.descriptors
            .iter()
            .find(|d| d.type_key().as_str() == identifier)
    }

    /// All descriptors, in registration order.
    pub fn all(&self) -> &[Arc<dyn TopLevelItemDescriptor>] {
        &self.descriptors
    }

    /// Instantiate a new item of the given type, if the type is installed.
    pub fn new_item(&self, identifier: &str, name: &str) -> Option<Box<dyn Item>> {
        self.find_by_identifier(identifier)
            .map(|d| d.new_instance(name))
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.descriptors.iter().map(|d| d.type_key()))
            .finish()
    }
}

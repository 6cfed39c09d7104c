//! Process bootstrap: plugins contribute item types and tags once, then the
//! result is frozen and shared read-only.

use crate::error::RegistryError;
use crate::registry::TypeRegistry;
use crate::store::{AliasTable, AliasTableBuilder, ConfigStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Extension points open during bootstrap.
#[derive(Debug, Default)]
pub struct ExtensionPoints {
    pub types: TypeRegistry,
    pub aliases: AliasTableBuilder,
}

/// A unit of functionality that contributes item types.
pub trait Plugin {
    fn name(&self) -> &str;

    fn contribute(&self, ext: &mut ExtensionPoints) -> Result<(), RegistryError>;
}

/// Frozen, process-scoped registries.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub types: Arc<TypeRegistry>,
    pub aliases: Arc<AliasTable>,
}

impl Runtime {
    /// Config store sharing this runtime's alias table.
    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::new(Arc::clone(&self.aliases))
    }
}

/// Run every plugin in order against one set of extension points and freeze
/// the result.
pub fn bootstrap(plugins: &[&dyn Plugin]) -> Result<Runtime, RegistryError> {
    let mut ext = ExtensionPoints::default();
    for plugin in plugins {
        debug!("Loading plugin '{}'", plugin.name());
        plugin.contribute(&mut ext)?;
    }
    let aliases = ext.aliases.build();
    info!(
        "Bootstrapped {} item types and {} type tags from {} plugins",
        ext.types.len(),
        aliases.tags().count(),
        plugins.len()
    );
    Ok(Runtime {
        types: Arc::new(ext.types),
        aliases: Arc::new(aliases),
    })
}

//! Item persistence.
//!
//! Each item lives in its own directory with exactly one `config.yaml`. The
//! root node of that document carries a YAML tag naming the item type, e.g.
//!
//! ```yaml
//! !project
//! description: Nightly build
//! disabled: false
//! ```
//!
//! Tags are resolved through the [`AliasTable`], so the type behind a tag can
//! be renamed or moved without breaking data already on disk. Nested typed
//! values (dependency edges, matrix axes) are tagged the same way through
//! [`Tagged`].

mod alias;
mod tagged;

pub use alias::{AliasTable, AliasTableBuilder, ItemDecoder, UnknownTag};
pub use tagged::Tagged;

use crate::error::{StoreError, StoreResult};
use crate::item::{Item, ItemGroup};
use crate::registry::TypeKey;
use serde_yaml::Value;
use serde_yaml::value::{Tag, TaggedValue};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// File name of an item's configuration inside its directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// A type that can be written to a config file.
pub trait Persistent {
    /// Implementation type identity, mapped to on-disk tags by the alias table.
    const TYPE: TypeKey;
}

/// Handle to one item's config file. Creating it does not touch the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read_to_string(&self) -> StoreResult<String> {
        std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                StoreError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })
    }

    /// Replace the file contents so that readers never see a partial file.
    fn write_atomic(&self, contents: &str) -> StoreResult<()> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".config")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// Loads and saves items using a shared alias table.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    aliases: Arc<AliasTable>,
}

impl ConfigStore {
    pub fn new(aliases: Arc<AliasTable>) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Config file inside an item directory.
    pub fn config_file_for(dir: &Path) -> ConfigFile {
        ConfigFile {
            path: dir.join(CONFIG_FILE_NAME),
        }
    }

    /// Config file of an attached item.
    pub fn config_file_of(item: &dyn Item) -> ConfigFile {
        Self::config_file_for(item.root_dir())
    }

    /// Load the item stored in `dir` and attach it to `parent`.
    ///
    /// The item's short name is the directory's base name.
    pub fn load(&self, parent: &dyn ItemGroup, dir: &Path) -> StoreResult<Box<dyn Item>> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| StoreError::NoItemName {
                path: dir.to_path_buf(),
            })?;
        let file = Self::config_file_for(dir);
        let mut item = self.read(&file)?;
        item.on_load(parent, &name);
        debug!("Loaded {} '{}' from {}", item.type_key(), item.full_name(), file.path().display());
        Ok(item)
    }

    /// Decode a config file without attaching the result to a parent.
    pub fn read(&self, file: &ConfigFile) -> StoreResult<Box<dyn Item>> {
        let text = file.read_to_string()?;
        self.parse_yaml(&text, file.path())
    }

    /// Decode config file contents. `source` is only used in errors.
    pub fn parse_yaml(&self, text: &str, source: &Path) -> StoreResult<Box<dyn Item>> {
        let path = || source.to_path_buf();
        let document: Value = serde_yaml::from_str(text).map_err(|e| StoreError::Malformed {
            path: path(),
            source: e,
        })?;

        let Value::Tagged(root) = document else {
            return Err(StoreError::MissingRootTag { path: path() });
        };
        let TaggedValue { tag, value: body } = *root;
        let tag = alias::tag_name(&tag);
        let key = self
            .aliases
            .resolve(&tag)
            .ok_or_else(|| StoreError::UnknownTag {
                path: path(),
                tag: tag.clone(),
            })?;
        let decoder = self
            .aliases
            .decoder(key)
            .ok_or_else(|| StoreError::NotAnItem {
                path: path(),
                tag: tag.clone(),
            })?;

        let body = self
            .aliases
            .decode(body)
            .map_err(|UnknownTag(tag)| StoreError::UnknownTag { path: path(), tag })?;
        decoder(body).map_err(|e| StoreError::Decode {
            path: path(),
            source: e,
        })
    }

    /// Encode an item as config file contents, using primary tags.
    pub fn to_yaml(&self, item: &dyn Item) -> StoreResult<String> {
        let serialize_err = |source: serde_yaml::Error| StoreError::Serialize {
            name: item.full_name().to_string(),
            source,
        };
        let body = item.to_value().map_err(serialize_err)?;
        let document = Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(item.type_key().as_str()),
            value: body,
        }));
        serde_yaml::to_string(&self.aliases.encode(document)).map_err(serialize_err)
    }

    /// Write the item's current state to its config file.
    pub fn save(&self, item: &dyn Item) -> StoreResult<()> {
        let file = Self::config_file_of(item);
        let text = self.to_yaml(item)?;
        file.write_atomic(&text)?;
        debug!("Saved {} '{}' to {}", item.type_key(), item.full_name(), file.path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_for_is_pure() {
        let file = ConfigStore::config_file_for(Path::new("/does/not/exist/job"));
        assert_eq!(file.path(), Path::new("/does/not/exist/job/config.yaml"));
        assert!(!file.exists());
    }
}

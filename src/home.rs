//! Root item group: the orchestrator's home directory.
//!
//! Top-level items live in `<root>/<jobs_dir>/<name>/config.yaml`.

use crate::error::{HomeError, StoreError};
use crate::item::{Item, ItemGroup, ItemLookup};
use crate::registry::TypeRegistry;
use crate::store::ConfigStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Outcome of loading every item under the jobs directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Full names of items that loaded, in directory order.
    pub loaded: Vec<String>,
    /// Item directories that failed, with the reason.
    pub failed: Vec<(PathBuf, StoreError)>,
}

impl LoadReport {
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            loaded: self.loaded.clone(),
            failed: self
                .failed
                .iter()
                .map(|(dir, err)| FailedLoad {
                    dir: dir.display().to_string(),
                    code: err.code(),
                    message: err.to_string(),
                })
                .collect(),
        }
    }
}

/// Serializable view of a [`LoadReport`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub loaded: Vec<String>,
    pub failed: Vec<FailedLoad>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedLoad {
    pub dir: String,
    pub code: crate::error::ErrorCode,
    pub message: String,
}

/// The root of the item hierarchy.
pub struct Home {
    root: PathBuf,
    jobs_dir: String,
    items: RwLock<BTreeMap<String, Arc<dyn Item>>>,
}

impl Home {
    pub fn new(root: impl Into<PathBuf>, jobs_dir: &str) -> Self {
        Self {
            root: root.into(),
            jobs_dir: jobs_dir.to_string(),
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one subdirectory per top-level item.
    pub fn jobs_root(&self) -> PathBuf {
        self.root.join(&self.jobs_dir)
    }

    /// Load every item directory under the jobs root.
    ///
    /// A failure is recorded and logged; it does not stop other items from
    /// loading. A missing jobs root is treated as empty.
    pub fn load_all(&self, store: &ConfigStore) -> LoadReport {
        let mut report = LoadReport::default();
        let jobs_root = self.jobs_root();
        let mut dirs: Vec<PathBuf> = match std::fs::read_dir(&jobs_root) {
            Ok(entries) => entries
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry.path()),
                    Err(e) => {
                        warn!("Failed to read entry in {}: {}", jobs_root.display(), e);
                        None
                    }
                })
                .filter(|p| p.is_dir())
                .collect(),
            Err(e) => {
                debug!("No jobs directory at {}: {}", jobs_root.display(), e);
                return report;
            }
        };
        dirs.sort();

        for dir in dirs {
            match store.load(self, &dir) {
                Ok(item) => {
                    report.loaded.push(item.full_name().to_string());
                    self.add(Arc::from(item));
                }
                Err(err) => {
                    warn!("Failed to load item from {}: {}", dir.display(), err);
                    report.failed.push((dir, err));
                }
            }
        }
        info!(
            "Loaded {} items ({} failed) from {}",
            report.loaded.len(),
            report.failed.len(),
            jobs_root.display()
        );
        report
    }

    /// Create a new top-level item of a registered type and save it.
    ///
    /// Fails with [`HomeError::AlreadyExists`] if the name is live or its
    /// directory is already on disk, including directories that failed to
    /// load. The items map stays write-locked until the new item is added.
    pub fn create_item(
        &self,
        registry: &TypeRegistry,
        store: &ConfigStore,
        type_id: &str,
        name: &str,
    ) -> Result<Arc<dyn Item>, HomeError> {
        check_name(name)?;
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let dir = self.root_dir_for(name);
        if items.contains_key(name) || dir.exists() {
            return Err(HomeError::AlreadyExists(name.to_string()));
        }
        let mut item = registry
            .new_item(type_id, name)
            .ok_or_else(|| HomeError::UnknownType(type_id.to_string()))?;
        item.on_load(self, name);
        store.save(item.as_ref())?;

        let item: Arc<dyn Item> = Arc::from(item);
        items.insert(item.full_name().to_string(), Arc::clone(&item));
        info!("Created {} '{}'", item.type_key(), item.full_name());
        Ok(item)
    }

    /// Register a live item under its full name, replacing any previous one.
    pub fn add(&self, item: Arc<dyn Item>) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(item.full_name().to_string(), item);
    }

    pub fn get(&self, full_name: &str) -> Option<Arc<dyn Item>> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(full_name)
            .cloned()
    }

    /// All live items, ordered by full name.
    pub fn items(&self) -> Vec<Arc<dyn Item>> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

impl ItemGroup for Home {
    fn full_name(&self) -> String {
        String::new()
    }

    fn root_dir_for(&self, child: &str) -> PathBuf {
        self.jobs_root().join(child)
    }
}

impl ItemLookup for Home {
    fn get_item_by_full_name(&self, full_name: &str) -> Option<Arc<dyn Item>> {
        self.get(full_name)
    }
}

fn check_name(name: &str) -> Result<(), HomeError> {
    let invalid = |reason| {
        Err(HomeError::InvalidName {
            name: name.to_string(),
            reason,
        })
    };
    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name != name.trim() {
        return invalid("has leading or trailing whitespace");
    }
    if name == "." || name == ".." {
        return invalid("reserved name");
    }
    if name.contains(['/', '\\']) {
        return invalid("contains a path separator");
    }
    if name.contains(',') {
        return invalid("contains ',' which separates names in name lists");
    }
    Ok(())
}

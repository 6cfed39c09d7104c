//! Free-style project: a job defined by a plain list of build commands.

use crate::item::{ItemCore, ItemLookup, from_name_list};
use crate::registry::TypeKey;
use crate::store::Persistent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreeStyleProject {
    #[serde(skip)]
    core: ItemCore,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub disabled: bool,

    /// Label expression of the node the job is tied to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_node: Option<String>,

    pub commands: Vec<String>,

    /// Downstream jobs, as a name list (`"a, folder/b"`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub child_projects: String,
}

impl FreeStyleProject {
    pub fn new(name: &str) -> Self {
        Self {
            core: ItemCore::new(name),
            ..Default::default()
        }
    }

    /// Resolve `child_projects` to live jobs of type `T`, skipping names that
    /// no longer resolve.
    pub fn downstream_projects<T: crate::item::Item>(&self, lookup: &dyn ItemLookup) -> Vec<Arc<T>> {
        from_name_list(lookup, &self.child_projects)
    }
}

impl Persistent for FreeStyleProject {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.FreeStyleProject");
}

crate::impl_item!(FreeStyleProject);

//! Job whose builds run outside the orchestrator and are only recorded here.

use crate::item::ItemCore;
use crate::registry::TypeKey;
use crate::store::Persistent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalJob {
    #[serde(skip)]
    core: ItemCore,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExternalJob {
    pub fn new(name: &str) -> Self {
        Self {
            core: ItemCore::new(name),
            description: None,
        }
    }
}

impl Persistent for ExternalJob {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.ExternalJob");
}

crate::impl_item!(ExternalJob);

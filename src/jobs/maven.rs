//! Maven module sets and the modules they contain.

use crate::item::ItemCore;
use crate::registry::TypeKey;
use crate::store::{Persistent, Tagged};
use serde::{Deserialize, Serialize};

/// Top-level job building a multi-module Maven project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MavenModuleSet {
    #[serde(skip)]
    core: ItemCore,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub disabled: bool,

    /// POM to build, relative to the workspace.
    pub root_pom: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
}

impl Default for MavenModuleSet {
    fn default() -> Self {
        Self {
            core: ItemCore::default(),
            description: None,
            disabled: false,
            root_pom: "pom.xml".to_string(),
            goals: None,
        }
    }
}

impl MavenModuleSet {
    pub fn new(name: &str) -> Self {
        Self {
            core: ItemCore::new(name),
            ..Default::default()
        }
    }
}

impl Persistent for MavenModuleSet {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.maven.MavenModuleSet");
}

crate::impl_item!(MavenModuleSet);

/// Dependency edge from one module to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleDependency {
    pub fn new(group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.map(str::to_string),
        }
    }
}

impl Persistent for ModuleDependency {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.maven.ModuleDependency");
}

/// One module of a module set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MavenModule {
    #[serde(skip)]
    core: ItemCore,

    pub group_id: String,
    pub artifact_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub dependencies: Vec<Tagged<ModuleDependency>>,
}

impl MavenModule {
    pub fn new(name: &str) -> Self {
        Self {
            core: ItemCore::new(name),
            ..Default::default()
        }
    }

    pub fn add_dependency(&mut self, dependency: ModuleDependency) -> &mut Self {
        self.dependencies.push(Tagged(dependency));
        self
    }

    /// Whether this module depends on `other`, ignoring versions.
    pub fn depends_on(&self, other: &MavenModule) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.group_id == other.group_id && d.artifact_id == other.artifact_id)
    }
}

impl Persistent for MavenModule {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.maven.MavenModule");
}

crate::impl_item!(MavenModule);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depends_on_ignores_version() {
        let mut util = MavenModule::new("util");
        util.group_id = "org.example".into();
        util.artifact_id = "util".into();
        util.version = Some("2.0".into());

        let mut core = MavenModule::new("core");
        core.add_dependency(ModuleDependency::new("org.example", "util", Some("1.0")));

        assert!(core.depends_on(&util));
        assert!(!util.depends_on(&core));
    }

    #[test]
    fn test_module_set_defaults_to_root_pom() {
        let set: MavenModuleSet = serde_yaml::from_str("goals: install\n").unwrap();
        assert_eq!(set.root_pom, "pom.xml");
        assert_eq!(set.goals.as_deref(), Some("install"));
    }
}

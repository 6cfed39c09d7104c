//! Built-in item types and their registration.

mod external;
mod freestyle;
mod matrix;
mod maven;

pub use external::ExternalJob;
pub use freestyle::FreeStyleProject;
pub use matrix::{Axis, Combination, MatrixConfiguration, MatrixProject, combination_name};
pub use maven::{MavenModule, MavenModuleSet, ModuleDependency};

use crate::bootstrap::{ExtensionPoints, Plugin};
use crate::error::RegistryError;
use crate::registry::SimpleDescriptor;
use crate::store::Persistent;

/// Registers the built-in job types and their on-disk tags.
#[derive(Debug, Default, Clone, Copy)]
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        "core"
    }

    fn contribute(&self, ext: &mut ExtensionPoints) -> Result<(), RegistryError> {
        ext.types
            .register(SimpleDescriptor::new(
                FreeStyleProject::TYPE,
                "Build a free-style software project",
                |name| Box::new(FreeStyleProject::new(name)),
            ))?
            .register(SimpleDescriptor::new(
                MavenModuleSet::TYPE,
                "Build a maven2 project",
                |name| Box::new(MavenModuleSet::new(name)),
            ))?
            .register(SimpleDescriptor::new(
                MatrixProject::TYPE,
                "Build multi-configuration project",
                |name| Box::new(MatrixProject::new(name)),
            ))?
            .register(SimpleDescriptor::new(
                ExternalJob::TYPE,
                "Monitor an external job",
                |name| Box::new(ExternalJob::new(name)),
            ))?;

        ext.aliases
            .item::<FreeStyleProject>("project")?
            .item::<MavenModule>("maven2")?
            .nested::<ModuleDependency>("dependency")?
            // Published by mistake for modules; old module configs still use it.
            .alias("maven2-module-set", MavenModule::TYPE)?
            .item::<MavenModuleSet>("maven2-moduleset")?
            .item::<MatrixProject>("matrix-project")?
            .nested::<Axis>("axis")?
            .item::<MatrixConfiguration>("matrix-config")?
            .bind_item::<ExternalJob>();
        Ok(())
    }
}

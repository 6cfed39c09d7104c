//! Contracts implemented by parameter value types.

use super::resolver::{NoVariables, VariableResolver};
use crate::build::Build;
use std::collections::BTreeMap;
use std::fmt;

/// Environment variables handed to build steps.
pub type EnvVars = BTreeMap<String, String>;

/// Something that decorates a build, set up before its steps run.
pub trait BuildWrapper: Send + Sync + fmt::Debug {
    fn display_name(&self) -> String;

    /// Prepare the build's workspace or environment.
    fn set_up(&self, build: &Build) -> std::io::Result<()>;
}

/// One named input bound to a single build.
///
/// Every hook is optional; the defaults contribute nothing.
pub trait ParameterValue: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Add this parameter's variables to `env`, overwriting existing entries.
    fn build_env_vars(&self, _build: &Build, _env: &mut EnvVars) {}

    fn create_build_wrapper(&self, _build: &Build) -> Option<Box<dyn BuildWrapper>> {
        None
    }

    /// Resolver for the variables this parameter defines.
    fn create_variable_resolver(&self, _build: &Build) -> Box<dyn VariableResolver> {
        Box::new(NoVariables)
    }
}

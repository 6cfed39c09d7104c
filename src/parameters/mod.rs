//! Build parameter resolution.
//!
//! A build's [`ParametersAction`] turns its ordered parameter values into
//! build wrappers, environment variables and a variable resolver for macro
//! substitution.

mod action;
mod resolver;
mod value;
mod values;

pub use action::ParametersAction;
pub use resolver::{NoVariables, Union, VariableResolver, replace_macro};
pub use value::{BuildWrapper, EnvVars, ParameterValue};
pub use values::{BooleanParameterValue, FileCopyWrapper, FileParameterValue, StringParameterValue};

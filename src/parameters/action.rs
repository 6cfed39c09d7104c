//! Parameter values recorded for one build and the views derived from them.

use super::resolver::{Union, VariableResolver, replace_macro};
use super::value::{BuildWrapper, EnvVars, ParameterValue};
use crate::build::Build;
use std::slice;
use std::sync::Arc;

/// The parameter values a build was started with.
///
/// Built once when the build starts and read-only afterwards, so it can be
/// shared across threads freely. Parameter names are not required to be
/// unique; see [`build_env_vars`](Self::build_env_vars) and
/// [`create_variable_resolver`](Self::create_variable_resolver) for how
/// duplicates resolve.
///
/// The action itself is not written to disk here. Build records own
/// persistence; the built-in values derive serde for them to use.
#[derive(Debug)]
pub struct ParametersAction {
    parameters: Vec<Box<dyn ParameterValue>>,
    build: Arc<Build>,
}

impl ParametersAction {
    pub fn new(parameters: Vec<Box<dyn ParameterValue>>, build: Arc<Build>) -> Self {
        Self { parameters, build }
    }

    /// The build these parameters belong to.
    pub fn build(&self) -> &Arc<Build> {
        &self.build
    }

    pub fn parameters(&self) -> &[Box<dyn ParameterValue>] {
        &self.parameters
    }

    pub fn iter(&self) -> slice::Iter<'_, Box<dyn ParameterValue>> {
        self.parameters.iter()
    }

    /// Wrappers contributed by the parameters, in parameter order.
    pub fn create_build_wrappers(&self, build: &Build) -> Vec<Box<dyn BuildWrapper>> {
        self.parameters
            .iter()
            .filter_map(|p| p.create_build_wrapper(build))
            .collect()
    }

    /// Let every parameter add its variables to `env`, in order.
    ///
    /// When two parameters define the same variable the later one wins.
    pub fn build_env_vars(&self, build: &Build, env: &mut EnvVars) {
        for p in &self.parameters {
            p.build_env_vars(build, env);
        }
    }

    /// Resolver over all parameters, then the build's own variables.
    ///
    /// Resolvers are consulted in parameter order and the first definition
    /// wins. This is the opposite of [`build_env_vars`](Self::build_env_vars)
    /// for duplicated names.
    pub fn create_variable_resolver(&self, build: &Build) -> Union {
        let mut resolvers: Vec<Box<dyn VariableResolver>> = self
            .parameters
            .iter()
            .map(|p| p.create_variable_resolver(build))
            .collect();
        resolvers.push(build.build_variable_resolver());
        Union::new(resolvers)
    }

    /// Expand `$name` / `${name}` in `text` using
    /// [`create_variable_resolver`](Self::create_variable_resolver).
    pub fn substitute(&self, build: &Build, text: &str) -> String {
        replace_macro(text, &self.create_variable_resolver(build))
    }
}

impl<'a> IntoIterator for &'a ParametersAction {
    type Item = &'a Box<dyn ParameterValue>;
    type IntoIter = slice::Iter<'a, Box<dyn ParameterValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::{BooleanParameterValue, FileParameterValue, StringParameterValue};

    fn action(parameters: Vec<Box<dyn ParameterValue>>) -> ParametersAction {
        ParametersAction::new(parameters, Arc::new(Build::new("app", 7, "/ws/app")))
    }

    #[test]
    fn test_env_last_wins() {
        let action = action(vec![
            Box::new(StringParameterValue::new("TARGET", "first")),
            Box::new(StringParameterValue::new("OTHER", "o")),
            Box::new(StringParameterValue::new("TARGET", "last")),
        ]);
        let mut env = EnvVars::new();
        action.build_env_vars(action.build(), &mut env);
        assert_eq!(env["TARGET"], "last");
        assert_eq!(env["OTHER"], "o");
    }

    #[test]
    fn test_resolver_first_wins() {
        let action = action(vec![
            Box::new(StringParameterValue::new("TARGET", "first")),
            Box::new(StringParameterValue::new("TARGET", "last")),
        ]);
        let resolver = action.create_variable_resolver(action.build());
        assert_eq!(resolver.resolve("TARGET").as_deref(), Some("first"));
        assert_eq!(resolver.len(), 3);
    }

    #[test]
    fn test_parameters_shadow_build_variables() {
        let action = action(vec![Box::new(StringParameterValue::new("BUILD_NUMBER", "override"))]);
        let resolver = action.create_variable_resolver(action.build());
        assert_eq!(resolver.resolve("BUILD_NUMBER").as_deref(), Some("override"));
        assert_eq!(resolver.resolve("JOB_NAME").as_deref(), Some("app"));
    }

    #[test]
    fn test_substitute_mixes_parameters_and_build_variables() {
        let action = action(vec![
            Box::new(StringParameterValue::new("ENV", "staging")),
            Box::new(BooleanParameterValue::new("FAST", false)),
        ]);
        let text = action.substitute(
            action.build(),
            "deploy ${JOB_NAME}#$BUILD_NUMBER to $ENV fast=${FAST} ${UNKNOWN}",
        );
        assert_eq!(text, "deploy app#7 to staging fast=false ${UNKNOWN}");
    }

    #[test]
    fn test_wrappers_skip_parameters_without_one() {
        let action = action(vec![
            Box::new(StringParameterValue::new("A", "a")),
            Box::new(FileParameterValue::new("F1", "one.txt", "1.txt", "/tmp/1")),
            Box::new(BooleanParameterValue::new("B", true)),
            Box::new(FileParameterValue::new("F2", "two.txt", "2.txt", "/tmp/2")),
        ]);
        let wrappers = action.create_build_wrappers(action.build());
        let names: Vec<String> = wrappers.iter().map(|w| w.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "Copy file parameter to one.txt",
                "Copy file parameter to two.txt"
            ]
        );
    }

    #[test]
    fn test_empty_action_resolves_build_only() {
        let action = action(Vec::new());
        assert!(action.create_build_wrappers(action.build()).is_empty());
        let mut env = EnvVars::new();
        action.build_env_vars(action.build(), &mut env);
        assert!(env.is_empty());
        assert_eq!(action.substitute(action.build(), "#$BUILD_NUMBER"), "#7");
    }

    #[test]
    fn test_iterates_in_order() {
        let action = action(vec![
            Box::new(StringParameterValue::new("A", "1")),
            Box::new(StringParameterValue::new("B", "2")),
        ]);
        let names: Vec<&str> = (&action).into_iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_action_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParametersAction>();
    }
}

//! Tests for build parameter resolution across a whole build.

use chrono::{TimeZone, Utc};
use jobcore::build::Build;
use jobcore::jobs::{Axis, MatrixProject};
use jobcore::parameters::{
    BooleanParameterValue, EnvVars, FileParameterValue, ParameterValue, ParametersAction,
    StringParameterValue, VariableResolver, replace_macro,
};
use std::sync::Arc;
use tempfile::TempDir;

fn parameters_for(build: Build, parameters: Vec<Box<dyn ParameterValue>>) -> ParametersAction {
    ParametersAction::new(parameters, Arc::new(build))
}

#[test]
fn substitution_prefers_parameters_over_build_variables() {
    let build = Build::new("release", 7, "/ws/release")
        .with_timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    let action = parameters_for(
        build,
        vec![
            Box::new(StringParameterValue::new("TARGET", "prod")),
            Box::new(StringParameterValue::new("BUILD_NUMBER", "override")),
        ],
    );

    let text = "deploy $TARGET #${BUILD_NUMBER} ($BUILD_ID) from $JOB_NAME, keep $HOME";
    assert_eq!(
        action.substitute(action.build(), text),
        "deploy prod #override (2024-01-02_03-04-05) from release, keep $HOME"
    );
}

#[test]
fn duplicate_names_resolve_differently_for_env_and_macros() {
    let action = parameters_for(
        Build::new("app", 1, "/ws"),
        vec![
            Box::new(StringParameterValue::new("MODE", "first")),
            Box::new(StringParameterValue::new("MODE", "second")),
        ],
    );

    let mut env = EnvVars::new();
    action.build_env_vars(action.build(), &mut env);
    assert_eq!(env["MODE"], "second");

    let resolver = action.create_variable_resolver(action.build());
    assert_eq!(resolver.resolve("MODE").as_deref(), Some("first"));
}

#[test]
fn env_vars_cover_every_parameter_kind() {
    let temp = TempDir::new().unwrap();
    let action = parameters_for(
        Build::new("app", 3, temp.path()),
        vec![
            Box::new(StringParameterValue::new("GREETING", "hello")),
            Box::new(BooleanParameterValue::new("DRY_RUN", true)),
            Box::new(FileParameterValue::new(
                "MANIFEST",
                "conf/manifest.json",
                "manifest-v2.json",
                temp.path().join("upload.tmp"),
            )),
        ],
    );

    let mut env = EnvVars::new();
    action.build_env_vars(action.build(), &mut env);
    assert_eq!(env.len(), 3);
    assert_eq!(env["GREETING"], "hello");
    assert_eq!(env["DRY_RUN"], "true");
    assert_eq!(env["MANIFEST"], "manifest-v2.json");
    assert_eq!(
        action.substitute(action.build(), "$GREETING/$DRY_RUN/$MANIFEST"),
        "hello/true/manifest-v2.json"
    );
}

#[test]
fn file_parameter_wrapper_copies_into_workspace() {
    let staging = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let upload = staging.path().join("upload.tmp");
    std::fs::write(&upload, "{\"env\": \"prod\"}").unwrap();

    let action = parameters_for(
        Build::new("app", 1, workspace.path()),
        vec![
            Box::new(StringParameterValue::new("TARGET", "prod")),
            Box::new(FileParameterValue::new(
                "MANIFEST",
                "conf/manifest.json",
                "manifest.json",
                &upload,
            )),
        ],
    );

    let wrappers = action.create_build_wrappers(action.build());
    assert_eq!(wrappers.len(), 1);
    wrappers[0].set_up(action.build()).unwrap();
    let copied = std::fs::read_to_string(workspace.path().join("conf/manifest.json")).unwrap();
    assert_eq!(copied, "{\"env\": \"prod\"}");
}

#[test]
fn matrix_axis_values_become_build_variables() {
    let mut matrix = MatrixProject::new("grid");
    matrix
        .add_axis(Axis::new("jdk", ["11", "17"]))
        .add_axis(Axis::new("os", ["linux", "mac"]));

    let mut commands = Vec::new();
    for combination in matrix.combinations() {
        let config = matrix.configuration(combination);
        let build = config
            .build_variables()
            .iter()
            .fold(Build::new("grid", 1, "/ws"), |b, (k, v)| b.with_variable(k, v));
        let action = parameters_for(build, Vec::new());
        commands.push(action.substitute(action.build(), "test --jdk=$jdk --os=${os}"));
    }
    assert_eq!(
        commands,
        vec![
            "test --jdk=11 --os=linux",
            "test --jdk=11 --os=mac",
            "test --jdk=17 --os=linux",
            "test --jdk=17 --os=mac",
        ]
    );
}

#[test]
fn replace_macro_accepts_plain_closures() {
    let resolver = |name: &str| (name == "X").then(|| "1".to_string());
    assert_eq!(replace_macro("$X$Y", &resolver), "1$Y");
}

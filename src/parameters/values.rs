//! Built-in parameter value types.

use super::resolver::VariableResolver;
use super::value::{BuildWrapper, EnvVars, ParameterValue};
use crate::build::Build;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolver that defines exactly one variable.
fn single(name: &str, value: &str) -> Box<dyn VariableResolver> {
    let name = name.to_string();
    let value = value.to_string();
    Box::new(move |n: &str| (n == name).then(|| value.clone()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringParameterValue {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StringParameterValue {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl ParameterValue for StringParameterValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn build_env_vars(&self, _build: &Build, env: &mut EnvVars) {
        env.insert(self.name.clone(), self.value.clone());
    }

    fn create_variable_resolver(&self, _build: &Build) -> Box<dyn VariableResolver> {
        single(&self.name, &self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanParameterValue {
    pub name: String,
    pub value: bool,
}

impl BooleanParameterValue {
    pub fn new(name: &str, value: bool) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

impl ParameterValue for BooleanParameterValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn build_env_vars(&self, _build: &Build, env: &mut EnvVars) {
        env.insert(self.name.clone(), self.value.to_string());
    }

    fn create_variable_resolver(&self, _build: &Build) -> Box<dyn VariableResolver> {
        single(&self.name, &self.value.to_string())
    }
}

/// An uploaded file, copied into the workspace before the build runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileParameterValue {
    pub name: String,
    /// Destination relative to the workspace.
    pub location: String,
    /// File name as uploaded by the user.
    pub original_file_name: String,
    /// Where the upload is held until the build starts.
    pub staged_path: PathBuf,
}

impl FileParameterValue {
    pub fn new(name: &str, location: &str, original_file_name: &str, staged_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            original_file_name: original_file_name.to_string(),
            staged_path: staged_path.into(),
        }
    }
}

impl ParameterValue for FileParameterValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn build_env_vars(&self, _build: &Build, env: &mut EnvVars) {
        env.insert(self.name.clone(), self.original_file_name.clone());
    }

    fn create_build_wrapper(&self, _build: &Build) -> Option<Box<dyn BuildWrapper>> {
        Some(Box::new(FileCopyWrapper {
            source: self.staged_path.clone(),
            location: self.location.clone(),
        }))
    }

    fn create_variable_resolver(&self, _build: &Build) -> Box<dyn VariableResolver> {
        single(&self.name, &self.original_file_name)
    }
}

/// Copies a staged file into the build workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCopyWrapper {
    pub source: PathBuf,
    pub location: String,
}

impl BuildWrapper for FileCopyWrapper {
    fn display_name(&self) -> String {
        format!("Copy file parameter to {}", self.location)
    }

    fn set_up(&self, build: &Build) -> io::Result<()> {
        let location = workspace_relative(&self.location)?;
        let target = build.workspace().join(location);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::copy(&self.source, &target)?;
        debug!("Copied {} to {}", self.source.display(), target.display());
        Ok(())
    }
}

/// Checks that `location` names a file inside the workspace.
fn workspace_relative(location: &str) -> io::Result<&Path> {
    let path = Path::new(location);
    let mut has_name = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_name = true,
            Component::CurDir => {}
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("file parameter location '{}' leaves the workspace", location),
                ));
            }
        }
    }
    if !has_name {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("file parameter location '{}' names no file", location),
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_string_value_hooks() {
        let build = Build::new("app", 1, "/ws");
        let p = StringParameterValue::new("GREETING", "hi").with_description("salutation");
        let mut env = EnvVars::new();
        p.build_env_vars(&build, &mut env);
        assert_eq!(env["GREETING"], "hi");
        assert_eq!(p.description(), Some("salutation"));
        assert!(p.create_build_wrapper(&build).is_none());

        let resolver = p.create_variable_resolver(&build);
        assert_eq!(resolver.resolve("GREETING").as_deref(), Some("hi"));
        assert_eq!(resolver.resolve("greeting"), None);
    }

    #[test]
    fn test_boolean_value_renders_lowercase() {
        let build = Build::new("app", 1, "/ws");
        let p = BooleanParameterValue::new("DRY_RUN", true);
        let mut env = EnvVars::new();
        p.build_env_vars(&build, &mut env);
        assert_eq!(env["DRY_RUN"], "true");
        assert_eq!(
            p.create_variable_resolver(&build).resolve("DRY_RUN").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_file_value_wrapper_copies_into_workspace() {
        let temp = TempDir::new().unwrap();
        let staged = temp.path().join("upload.bin");
        fs::write(&staged, b"payload").unwrap();
        let workspace = temp.path().join("ws");

        let build = Build::new("app", 3, &workspace);
        let p = FileParameterValue::new("CERT", "conf/cert.pem", "my-cert.pem", &staged);

        let mut env = EnvVars::new();
        p.build_env_vars(&build, &mut env);
        assert_eq!(env["CERT"], "my-cert.pem");

        let wrapper = p.create_build_wrapper(&build).unwrap();
        assert_eq!(wrapper.display_name(), "Copy file parameter to conf/cert.pem");
        wrapper.set_up(&build).unwrap();
        assert_eq!(fs::read(workspace.join("conf/cert.pem")).unwrap(), b"payload");
    }

    #[test]
    fn test_file_value_missing_upload_fails_setup() {
        let temp = TempDir::new().unwrap();
        let build = Build::new("app", 3, temp.path());
        let p = FileParameterValue::new("CERT", "cert.pem", "c.pem", temp.path().join("gone"));
        let wrapper = p.create_build_wrapper(&build).unwrap();
        assert!(wrapper.set_up(&build).is_err());
    }

    #[test]
    fn test_file_value_location_must_stay_in_workspace() {
        let temp = TempDir::new().unwrap();
        let staged = temp.path().join("upload.bin");
        fs::write(&staged, b"payload").unwrap();
        let workspace = temp.path().join("ws");
        let build = Build::new("app", 3, &workspace);

        let outside = temp.path().join("outside.txt");
        for location in [outside.to_str().unwrap(), "../escaped.txt", "conf/../../x", "", "."] {
            let p = FileParameterValue::new("CERT", location, "c.pem", &staged);
            let err = p.create_build_wrapper(&build).unwrap().set_up(&build).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "location {:?}", location);
        }
        assert!(!outside.exists());
        assert!(!temp.path().join("escaped.txt").exists());

        let p = FileParameterValue::new("CERT", "./conf/cert.pem", "c.pem", &staged);
        p.create_build_wrapper(&build).unwrap().set_up(&build).unwrap();
        assert_eq!(fs::read(workspace.join("conf/cert.pem")).unwrap(), b"payload");
    }

    #[test]
    fn test_values_survive_yaml_round_trip() {
        let string = StringParameterValue::new("TARGET", "prod").with_description("where to deploy");
        let text = serde_yaml::to_string(&string).unwrap();
        assert_eq!(serde_yaml::from_str::<StringParameterValue>(&text).unwrap(), string);

        let boolean = BooleanParameterValue::new("DRY_RUN", true);
        let text = serde_yaml::to_string(&boolean).unwrap();
        assert_eq!(serde_yaml::from_str::<BooleanParameterValue>(&text).unwrap(), boolean);

        let file = FileParameterValue::new("CERT", "conf/cert.pem", "my-cert.pem", "/staging/42");
        let text = serde_yaml::to_string(&file).unwrap();
        assert_eq!(serde_yaml::from_str::<FileParameterValue>(&text).unwrap(), file);

        let untagged: StringParameterValue = serde_yaml::from_str("name: A\nvalue: b\n").unwrap();
        assert_eq!(untagged.description, None);
    }
}

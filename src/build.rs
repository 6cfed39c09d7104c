//! Intrinsic state of one build execution.

use crate::parameters::VariableResolver;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Format of build ids, derived from the build's start time.
pub const BUILD_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// One execution of a job, as seen by parameter resolution.
#[derive(Debug, Clone)]
pub struct Build {
    job_full_name: String,
    number: u32,
    timestamp: DateTime<Utc>,
    workspace: PathBuf,
    extra: BTreeMap<String, String>,
}

impl Build {
    pub fn new(job_full_name: &str, number: u32, workspace: impl Into<PathBuf>) -> Self {
        Self {
            job_full_name: job_full_name.to_string(),
            number,
            timestamp: Utc::now(),
            workspace: workspace.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Add a build variable, e.g. a matrix axis value.
    pub fn with_variable(mut self, name: &str, value: &str) -> Self {
        self.extra.insert(name.to_string(), value.to_string());
        self
    }

    pub fn job_full_name(&self) -> &str {
        &self.job_full_name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn id(&self) -> String {
        self.timestamp.format(BUILD_ID_FORMAT).to_string()
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Variables every build defines, plus any added with
    /// [`with_variable`](Self::with_variable). Added variables win.
    pub fn build_variables(&self) -> BTreeMap<String, String> {
        let mut vars = BTreeMap::new();
        vars.insert("BUILD_NUMBER".to_string(), self.number.to_string());
        vars.insert("BUILD_ID".to_string(), self.id());
        vars.insert("JOB_NAME".to_string(), self.job_full_name.clone());
        vars.insert(
            "WORKSPACE".to_string(),
            self.workspace.to_string_lossy().into_owned(),
        );
        vars.extend(self.extra.clone());
        vars
    }

    pub fn build_variable_resolver(&self) -> Box<dyn VariableResolver> {
        Box::new(self.build_variables())
    }
}

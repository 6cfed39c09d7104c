//! Multi-configuration projects: one build per combination of axis values.

use crate::item::ItemCore;
use crate::registry::TypeKey;
use crate::store::{Persistent, Tagged};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Assignment of one value to every axis.
pub type Combination = BTreeMap<String, String>;

/// A named axis and the values it takes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Axis {
    pub fn new<I, S>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Persistent for Axis {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.matrix.Axis");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixProject {
    #[serde(skip)]
    core: ItemCore,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub disabled: bool,

    pub axes: Vec<Tagged<Axis>>,
}

impl MatrixProject {
    pub fn new(name: &str) -> Self {
        Self {
            core: ItemCore::new(name),
            ..Default::default()
        }
    }

    pub fn add_axis(&mut self, axis: Axis) -> &mut Self {
        self.axes.push(Tagged(axis));
        self
    }

    /// Every combination of axis values, first axis varying slowest.
    ///
    /// A project without axes has exactly one (empty) combination; an axis
    /// without values yields none.
    pub fn combinations(&self) -> Vec<Combination> {
        let mut result = vec![Combination::new()];
        for axis in &self.axes {
            result = result
                .into_iter()
                .flat_map(|partial| {
                    axis.values.iter().map(move |value| {
                        let mut next = partial.clone();
                        next.insert(axis.name.clone(), value.clone());
                        next
                    })
                })
                .collect();
        }
        result
    }

    /// Number of configurations this project expands to.
    pub fn configuration_count(&self) -> usize {
        self.combinations().len()
    }

    /// Child configuration for one combination of this project.
    pub fn configuration(&self, combination: Combination) -> MatrixConfiguration {
        let mut config = MatrixConfiguration::new(&combination_name(&combination));
        config.combination = combination;
        config
    }
}

impl Persistent for MatrixProject {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.matrix.MatrixProject");
}

crate::impl_item!(MatrixProject);

/// One cell of a matrix project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfiguration {
    #[serde(skip)]
    core: ItemCore,

    pub combination: Combination,
}

impl MatrixConfiguration {
    pub fn new(name: &str) -> Self {
        Self {
            core: ItemCore::new(name),
            combination: Combination::new(),
        }
    }

    /// Axis values as build variables.
    pub fn build_variables(&self) -> &Combination {
        &self.combination
    }
}

impl Persistent for MatrixConfiguration {
    const TYPE: TypeKey = TypeKey::new("jobcore.jobs.matrix.MatrixConfiguration");
}

crate::impl_item!(MatrixConfiguration);

/// `axis=value` pairs joined with `,`, in axis-name order.
pub fn combination_name(combination: &Combination) -> String {
    combination
        .iter()
        .map(|(axis, value)| format!("{}={}", axis, value))
        .collect::<Vec<_>>()
        .join(",")
}

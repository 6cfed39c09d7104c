//! Named-variable lookup and `$name` / `${name}` macro expansion.

use regex_lite::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

/// Source of named variables.
pub trait VariableResolver {
    /// Value of `name`, or `None` if this source does not define it.
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> VariableResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl VariableResolver for BTreeMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VariableResolver for HashMap<String, String> {
    fn resolve(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Resolver that defines nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVariables;

impl VariableResolver for NoVariables {
    fn resolve(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Chain of resolvers queried in order; the first one that defines a name wins.
#[derive(Default)]
pub struct Union {
    resolvers: Vec<Box<dyn VariableResolver>>,
}

impl Union {
    pub fn new(resolvers: Vec<Box<dyn VariableResolver>>) -> Self {
        Self { resolvers }
    }

    pub fn push(&mut self, resolver: Box<dyn VariableResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl VariableResolver for Union {
    fn resolve(&self, name: &str) -> Option<String> {
        self.resolvers.iter().find_map(|r| r.resolve(name))
    }
}

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z0-9_]+|\{[A-Za-z0-9_.]+\})").expect("variable pattern is valid")
});

/// Expand `$name` and `${name}` in `text`.
///
/// Names the resolver does not define are left exactly as written. Expanded
/// values are not scanned again.
pub fn replace_macro(text: &str, resolver: &dyn VariableResolver) -> String {
    VARIABLE
        .replace_all(text, |caps: &Captures<'_>| {
            let token = &caps[1];
            let name = token
                .strip_prefix('{')
                .and_then(|t| t.strip_suffix('}'))
                .unwrap_or(token);
            resolver
                .resolve(name)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

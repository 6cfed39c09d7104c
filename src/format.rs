//! Output formatting for command results, as markdown or JSON.

use crate::home::LoadSummary;
use crate::parameters::EnvVars;
use crate::registry::TypeRegistry;
use crate::store::AliasTable;
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    #[value(alias = "md")]
    Markdown,
}

/// One creatable item type with the tags it is stored under.
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    pub key: String,
    pub display_name: String,
    /// Primary tag first, then compatibility aliases.
    pub tags: Vec<String>,
}

/// Summaries of every registered top-level type, in registration order.
pub fn type_summaries(registry: &TypeRegistry, aliases: &AliasTable) -> Vec<TypeSummary> {
    registry
        .all()
        .iter()
        .map(|descriptor| {
            let key = descriptor.type_key();
            let mut tags = aliases.tags_for(key);
            if tags.is_empty() {
                tags.push(aliases.primary_tag(key));
            }
            TypeSummary {
                key: key.to_string(),
                display_name: descriptor.display_name().to_string(),
                tags: tags.into_iter().map(str::to_string).collect(),
            }
        })
        .collect()
}

pub fn format_types_markdown(types: &[TypeSummary]) -> String {
    let mut md = format!("# Item types ({})\n\n", types.len());
    for t in types {
        md.push_str(&format!("## {}\n", t.display_name));
        md.push_str(&format!("- **key**: `{}`\n", t.key));
        if let Some((primary, aliases)) = t.tags.split_first() {
            md.push_str(&format!("- **tag**: `!{}`\n", primary));
            if !aliases.is_empty() {
                let aliases: Vec<String> = aliases.iter().map(|a| format!("`!{}`", a)).collect();
                md.push_str(&format!("- **aliases**: {}\n", aliases.join(", ")));
            }
        }
        md.push('\n');
    }
    md
}

pub fn format_load_report_markdown(report: &LoadSummary) -> String {
    let mut md = format!(
        "# Items ({} loaded, {} failed)\n\n",
        report.loaded.len(),
        report.failed.len()
    );
    for name in &report.loaded {
        md.push_str(&format!("- {}\n", name));
    }
    if !report.failed.is_empty() {
        md.push_str("\n## Failed\n\n");
        for failure in &report.failed {
            md.push_str(&format!(
                "- `{}` [{:?}]: {}\n",
                failure.dir, failure.code, failure.message
            ));
        }
    }
    md
}

/// Environment variables as a markdown table.
pub fn format_env_markdown(env: &EnvVars) -> String {
    let mut md = String::from("| Name | Value |\n|------|-------|\n");
    for (name, value) in env {
        md.push_str(&format!("| {} | {} |\n", name, value.replace('|', "\\|")));
    }
    md
}

/// Render `value` in the requested format, using `markdown` for the
/// markdown form.
pub fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    markdown: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Markdown => Ok(markdown(value)),
    }
}

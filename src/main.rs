//! jobcore command-line tool.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use jobcore::bootstrap::{Runtime, bootstrap};
use jobcore::build::Build;
use jobcore::cli::{Cli, Command, ExpandArgs};
use jobcore::config::{Config, ConfigLoader};
use jobcore::format::{self, OutputFormat};
use jobcore::home::Home;
use jobcore::jobs::CorePlugin;
use jobcore::logging::{self, LogTarget};
use jobcore::parameters::{EnvVars, ParameterValue, ParametersAction, StringParameterValue};
use serde_json::json;
use std::sync::Arc;
use tracing::{Level, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config file picks the default log level, so read it before logging
    // is up; loader errors are reported through anyhow instead.
    if let Some(config_path) = &cli.config {
        // SAFETY: single-threaded at this point
        unsafe {
            std::env::set_var("JOBCORE_CONFIG_PATH", config_path);
        }
    }
    let mut loader = ConfigLoader::load()?;
    if let Some(home) = &cli.home {
        loader.config_mut().home.root = home.into();
    }
    let config = loader.into_config();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        logging::parse_level(&config.logging.level)?
    };
    logging::init(&LogTarget::parse(&cli.log), level)?;

    let runtime = bootstrap(&[&CorePlugin])?;
    let home = Home::new(&config.home.root, &config.home.jobs_dir);

    let output = match cli.command {
        Command::Types => run_types(&runtime, cli.format)?,
        Command::Load => run_load(&runtime, &home, cli.format)?,
        Command::Show { job } => run_show(&runtime, &home, &job)?,
        Command::Create { item_type, name } => {
            run_create(&runtime, &home, &item_type, &name, cli.format)?
        }
        Command::Resave { jobs } => run_resave(&runtime, &home, &jobs, cli.format)?,
        Command::Expand(args) => run_expand(&config, args, cli.format)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

fn run_types(runtime: &Runtime, format: OutputFormat) -> Result<String> {
    let types = format::type_summaries(&runtime.types, &runtime.aliases);
    format::render(format, types.as_slice(), format::format_types_markdown)
}

fn run_load(runtime: &Runtime, home: &Home, format: OutputFormat) -> Result<String> {
    let report = home.load_all(&runtime.config_store());
    format::render(format, &report.summary(), format::format_load_report_markdown)
}

fn run_show(runtime: &Runtime, home: &Home, job: &str) -> Result<String> {
    let store = runtime.config_store();
    home.load_all(&store);
    let item = home
        .get(job)
        .ok_or_else(|| anyhow!("No loadable item named '{}'", job))?;
    Ok(store.to_yaml(item.as_ref())?)
}

fn run_create(
    runtime: &Runtime,
    home: &Home,
    item_type: &str,
    name: &str,
    format: OutputFormat,
) -> Result<String> {
    let store = runtime.config_store();
    home.load_all(&store);
    // Accept an on-disk tag as well as a type key
    let type_id = runtime
        .aliases
        .resolve(item_type)
        .map(|key| key.as_str())
        .unwrap_or(item_type);
    let item = home.create_item(&runtime.types, &store, type_id, name)?;
    info!("Wrote {}", item.root_dir().display());

    let created = json!({
        "name": item.full_name(),
        "type": item.type_key().as_str(),
        "dir": item.root_dir().display().to_string(),
    });
    format::render(format, &created, |_| {
        format!(
            "Created `{}` ({}) in `{}`\n",
            item.full_name(),
            item.type_key(),
            item.root_dir().display()
        )
    })
}

fn run_resave(
    runtime: &Runtime,
    home: &Home,
    jobs: &[String],
    format: OutputFormat,
) -> Result<String> {
    let store = runtime.config_store();
    let report = home.load_all(&store);
    let targets: Vec<String> = if jobs.is_empty() {
        report.loaded.clone()
    } else {
        jobs.to_vec()
    };

    let mut saved = Vec::new();
    for name in &targets {
        let item = home
            .get(name)
            .ok_or_else(|| anyhow!("No loadable item named '{}'", name))?;
        store
            .save(item.as_ref())
            .with_context(|| format!("Failed to resave '{}'", name))?;
        saved.push(name.clone());
    }
    if !report.failed.is_empty() && jobs.is_empty() {
        bail!(
            "Resaved {} items; {} could not be loaded (run `jobcore load` for details)",
            saved.len(),
            report.failed.len()
        );
    }
    format::render(format, &json!({ "saved": saved }), |_| {
        let mut md = format!("# Resaved ({})\n\n", saved.len());
        for name in &saved {
            md.push_str(&format!("- {}\n", name));
        }
        md
    })
}

fn run_expand(config: &Config, args: ExpandArgs, format: OutputFormat) -> Result<String> {
    let workspace = config.home.root.join("workspace").join(&args.job);
    let build = Arc::new(Build::new(&args.job, args.number, workspace));
    let parameters: Vec<Box<dyn ParameterValue>> = args
        .params
        .iter()
        .map(|(name, value)| {
            Box::new(StringParameterValue::new(name, value)) as Box<dyn ParameterValue>
        })
        .collect();
    let action = ParametersAction::new(parameters, Arc::clone(&build));

    if args.env {
        let mut env: EnvVars = build.build_variables();
        action.build_env_vars(&build, &mut env);
        return format::render(format, &env, format::format_env_markdown);
    }

    let text = args.text.unwrap_or_default();
    let expanded = action.substitute(&build, &text);
    format::render(format, &json!({ "text": text, "expanded": expanded }), |_| {
        expanded.clone()
    })
}

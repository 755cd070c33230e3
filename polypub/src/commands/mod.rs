//! Command implementations for the CLI.

mod list;
mod prompt;
mod publish;
mod reporter;

use std::path::Path;

use anyhow::{Context, Result};
use polypub_core::{Config, PublishPlan, Selection};

use crate::Cli;

pub use list::cmd_list;
pub use publish::cmd_publish;

/// Runs the invocation and returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    let config = Config::load(&cli.root)
        .with_context(|| format!("failed to load configuration from {}", cli.root.display()))?;

    let selection = Selection {
        only: cli.only.clone(),
        exclude: cli.exclude.clone(),
        strict_exclude: cli.strict_exclude,
    };

    if cli.list {
        let plan = plan(&cli.root, &config, &selection)?;
        cmd_list(&plan, cli.json)?;
        return Ok(0);
    }

    cmd_publish(cli, config, selection)
}

fn plan(root: &Path, config: &Config, selection: &Selection) -> Result<PublishPlan> {
    let plan = PublishPlan::build(root, config, selection)?;
    if plan.ordering.degraded {
        crate::formatting::print_warning(
            "Dependency cycle detected: publish order is alphabetical, not topological",
        );
    }
    Ok(plan)
}

//! Build and publish the resolved targets.

use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use polypub_core::git::ensure_clean;
use polypub_core::{
    ConfirmationGate, GitWorkingTree, PipelineRunner, ProcessRunner, RunMode, RunOptions,
    RunReport, Selection,
};

use crate::formatting::{
    format_duration, print_error, print_key_value, print_section_header,
    print_separator_with_spacing, print_success, print_summary_box, print_warning, SectionStyle,
    Status,
};
use crate::Cli;

use super::prompt::TerminalPrompt;
use super::reporter::CliPipelineReporter;

fn run_options(cli: &Cli, config: &polypub_core::Config) -> Result<RunOptions> {
    let mode = RunMode::derive(cli.publish, cli.yes, cli.dry_run);
    let options = RunOptions {
        tag: cli.tag.clone().unwrap_or_default(),
        dry_run: mode.dry_run,
        auto_confirm: cli.yes,
        skip_build: cli.skip_build,
        tolerate_republish: cli.tolerate_republish,
        allow_dirty: cli.allow_dirty,
        run_scripts: cli.run_scripts,
        registry: cli.registry.clone().or_else(|| config.registry.clone()),
        access: cli.access.map(Into::into).or(config.access),
        otp: cli.otp.clone(),
        client: cli.client.clone().unwrap_or_else(|| config.client.clone()),
    };
    Ok(options.validated()?)
}

/// Plans, confirms and runs the pipeline. Returns the exit code.
pub fn cmd_publish(cli: Cli, config: polypub_core::Config, selection: Selection) -> Result<i32> {
    let options = run_options(&cli, &config)?;
    let plan = super::plan(&cli.root, &config, &selection)?;
    let targets = plan.target_packages();

    let title = if options.dry_run {
        "Publish Plan (Dry Run)"
    } else {
        "Publish Plan"
    };
    print_section_header(title, SectionStyle::Primary);
    print_key_value("Tag", &options.tag);
    print_key_value("Packages", &targets.len().to_string());
    print_key_value(
        "Order",
        &targets
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(" → "),
    );
    println!();

    if options.requires_clean_tree() {
        ensure_clean(&GitWorkingTree::new(&cli.root), &cli.root)?;
    }

    let mut prompt = TerminalPrompt::new();
    if !ConfirmationGate::should_proceed(&options, targets.len(), &mut prompt)? {
        print_warning("Aborted");
        return Ok(0);
    }

    let start = Instant::now();
    let reporter = CliPipelineReporter::new(targets.len());
    let mut runner = ProcessRunner;
    let report = PipelineRunner::new(&options, &mut runner, &reporter).run(&targets);

    if let Some(path) = &cli.report {
        let written = report
            .write_json(path)
            .with_context(|| format!("failed to write report to {}", path.display()));
        match written {
            Err(e) if report.succeeded() => return Err(e),
            Err(e) => print_warning(&format!("{:#}", e)),
            Ok(()) => {}
        }
    }

    print_separator_with_spacing();
    print_results(&report);
    let duration_str = format_duration(start.elapsed().as_secs_f64());
    print_summary_box("Summary", &[("Duration", &duration_str)]);
    println!();

    Ok(report.exit_code())
}

fn print_results(report: &RunReport) {
    let published = report.state.published();
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("Status").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Package").add_attribute(comfy_table::Attribute::Bold),
        ])
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);

    for name in &report.targets {
        let row = if published.contains(&name.as_str()) {
            vec![
                Cell::new(Status::Success.symbol()).fg(comfy_table::Color::Green),
                Cell::new(name).fg(comfy_table::Color::White),
            ]
        } else if report
            .failure
            .as_ref()
            .is_some_and(|f| &f.package == name)
        {
            vec![
                Cell::new(Status::Error.symbol()).fg(comfy_table::Color::Red),
                Cell::new(name).fg(comfy_table::Color::Red),
            ]
        } else {
            vec![
                Cell::new("-").fg(comfy_table::Color::DarkGrey),
                Cell::new(name).fg(comfy_table::Color::DarkGrey),
            ]
        };
        table.add_row(row);
    }
    println!("{}", table);
    println!();

    match &report.failure {
        None if report.dry_run => print_success(&format!(
            "Dry run finished for {} packages",
            published.len()
        )),
        None => print_success(&format!("Published {} packages", published.len())),
        Some(failure) => print_error(&format!(
            "{} failed for {} with exit code {}",
            failure.step, failure.package, failure.exit_code
        )),
    }
}

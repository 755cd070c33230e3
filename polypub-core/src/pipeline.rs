//! Sequential build and publish pipeline.
//!
//! Targets are processed one at a time in publish order. The first step
//! that fails ends the run; nothing already published is rolled back.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::options::RunOptions;
use crate::package::Package;

/// Exit code recorded when a step could not report one of its own.
pub const GENERIC_FAILURE: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Build,
    Publish,
}

impl Step {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Build => "build",
            Step::Publish => "publish",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subprocess invocation for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl StepCommand {
    /// `<client> run build` in the package directory.
    pub fn build(options: &RunOptions, package: &Package) -> Self {
        Self {
            program: options.client.clone(),
            args: vec!["run".to_string(), "build".to_string()],
            cwd: package.path.clone(),
        }
    }

    /// `<client> publish --tag <tag>` plus the flags the options ask for.
    pub fn publish(options: &RunOptions, package: &Package) -> Self {
        let mut args = vec![
            "publish".to_string(),
            "--tag".to_string(),
            options.tag.clone(),
        ];
        if options.dry_run {
            args.push("--dry-run".to_string());
        }
        if options.tolerate_republish {
            args.push("--tolerate-republish".to_string());
        }
        if !options.run_scripts {
            args.push("--ignore-scripts".to_string());
        }
        if let Some(registry) = &options.registry {
            args.push("--registry".to_string());
            args.push(registry.clone());
        }
        if let Some(access) = options.access {
            args.push("--access".to_string());
            args.push(access.as_str().to_string());
        }
        if let Some(otp) = &options.otp {
            args.push("--otp".to_string());
            args.push(otp.clone());
        }
        Self {
            program: options.client.clone(),
            args,
            cwd: package.path.clone(),
        }
    }

    /// Command line for display, with the one-time password masked.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        let mut mask_next = false;
        for arg in &self.args {
            if mask_next {
                parts.push("***".to_string());
                mask_next = false;
            } else {
                mask_next = arg == "--otp";
                parts.push(arg.clone());
            }
        }
        parts.join(" ")
    }
}

/// Runs a step command and returns its exit code.
pub trait CommandRunner {
    fn run(&mut self, package: &str, command: &StepCommand) -> Result<i32>;
}

/// Spawns real processes with the terminal's standard streams.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, package: &str, command: &StepCommand) -> Result<i32> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::Spawn {
                package: package.to_string(),
                program: command.program.clone(),
                message: e.to_string(),
            })?;
        Ok(status.code().unwrap_or(GENERIC_FAILURE))
    }
}

/// Receives progress from the pipeline so the core never writes to the
/// terminal itself.
pub trait PipelineReporter {
    fn step_started(&self, package: &Package, step: Step, command: &StepCommand);

    fn step_finished(&self, package: &Package, step: Step, exit_code: i32, duration: Duration);

    fn build_skipped(&self, _package: &Package) {}
}

/// A step that completed successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub package: String,
    pub version: String,
    pub step: Step,
    pub duration_ms: u64,
}

/// The step that ended the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub package: String,
    pub step: Step,
    pub exit_code: i32,
    pub message: Option<String>,
}

/// Steps completed so far. Each completed step yields a new state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunState {
    completed: Vec<StepRecord>,
}

impl RunState {
    #[must_use]
    pub fn record(self, record: StepRecord) -> Self {
        let mut completed = self.completed;
        completed.push(record);
        Self { completed }
    }

    pub fn completed(&self) -> &[StepRecord] {
        &self.completed
    }

    /// Packages whose publish step finished.
    pub fn published(&self) -> Vec<&str> {
        self.completed
            .iter()
            .filter(|r| r.step == Step::Publish)
            .map(|r| r.package.as_str())
            .collect()
    }

    /// Packages any step ran for, counting each once.
    pub fn attempted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.completed {
            if names.last() != Some(&record.package.as_str()) {
                names.push(&record.package);
            }
        }
        names
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub tag: String,
    pub dry_run: bool,
    pub targets: Vec<String>,
    pub state: RunState,
    pub failure: Option<StepFailure>,
}

impl RunReport {
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Zero on success, otherwise the failing step's own exit code.
    pub fn exit_code(&self) -> i32 {
        match &self.failure {
            None => 0,
            Some(failure) if failure.exit_code == 0 => GENERIC_FAILURE,
            Some(failure) => failure.exit_code,
        }
    }

    /// Writes the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Builds and publishes targets in order, stopping at the first failure.
pub struct PipelineRunner<'a> {
    options: &'a RunOptions,
    runner: &'a mut dyn CommandRunner,
    reporter: &'a dyn PipelineReporter,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(
        options: &'a RunOptions,
        runner: &'a mut dyn CommandRunner,
        reporter: &'a dyn PipelineReporter,
    ) -> Self {
        Self {
            options,
            runner,
            reporter,
        }
    }

    pub fn run(mut self, targets: &[&Package]) -> RunReport {
        let mut state = RunState::default();
        let mut failure = None;

        'targets: for package in targets {
            for (step, command) in self.steps(package) {
                match self.execute(package, step, &command) {
                    Ok(record) => state = state.record(record),
                    Err(step_failure) => {
                        tracing::error!(
                            package = %package.name,
                            step = %step,
                            exit_code = step_failure.exit_code,
                            "step failed, stopping run"
                        );
                        failure = Some(step_failure);
                        break 'targets;
                    }
                }
            }
        }

        RunReport {
            tag: self.options.tag.clone(),
            dry_run: self.options.dry_run,
            targets: targets.iter().map(|p| p.name.clone()).collect(),
            state,
            failure,
        }
    }

    fn steps(&self, package: &Package) -> Vec<(Step, StepCommand)> {
        let mut steps = Vec::with_capacity(2);
        if !self.options.skip_build && package.has_build() {
            steps.push((Step::Build, StepCommand::build(self.options, package)));
        } else {
            self.reporter.build_skipped(package);
        }
        steps.push((Step::Publish, StepCommand::publish(self.options, package)));
        steps
    }

    fn execute(
        &mut self,
        package: &Package,
        step: Step,
        command: &StepCommand,
    ) -> std::result::Result<StepRecord, StepFailure> {
        tracing::info!(package = %package.name, step = %step, command = %command.display(), "running step");
        self.reporter.step_started(package, step, command);

        let start = Instant::now();
        let outcome = self.runner.run(&package.name, command);
        let duration = start.elapsed();

        let (exit_code, message) = match outcome {
            Ok(code) => (code, None),
            Err(e) => (GENERIC_FAILURE, Some(e.to_string())),
        };
        self.reporter
            .step_finished(package, step, exit_code, duration);

        if exit_code == 0 {
            Ok(StepRecord {
                package: package.name.clone(),
                version: package.version.clone(),
                step,
                duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            })
        } else {
            Err(StepFailure {
                package: package.name.clone(),
                step,
                exit_code,
                message,
            })
        }
    }
}

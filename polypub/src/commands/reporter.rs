//! Pipeline reporter implementation for CLI.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use owo_colors::OwoColorize;
use polypub_core::{Package, PipelineReporter, Step, StepCommand};

use crate::formatting::{format_duration, Status};

/// CLI implementation of PipelineReporter.
pub struct CliPipelineReporter {
    total: usize,
    current: Cell<usize>,
    last_package: RefCell<String>,
}

impl CliPipelineReporter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current: Cell::new(0),
            last_package: RefCell::new(String::new()),
        }
    }

    fn announce(&self, package: &Package) {
        if *self.last_package.borrow() == package.name {
            return;
        }
        self.last_package.replace(package.name.clone());
        self.current.set(self.current.get() + 1);
        println!();
        println!(
            "{} {} {}",
            format!("[{}/{}]", self.current.get(), self.total).bright_black().bold(),
            package.name.bold().white(),
            package.version.bright_black()
        );
    }
}

impl PipelineReporter for CliPipelineReporter {
    fn step_started(&self, package: &Package, step: Step, command: &StepCommand) {
        self.announce(package);
        println!(
            "  {} {} {}",
            Status::Info.colored_symbol(),
            step.as_str().cyan(),
            command.display().bright_black()
        );
    }

    fn step_finished(&self, _package: &Package, step: Step, exit_code: i32, duration: Duration) {
        let elapsed = format_duration(duration.as_secs_f64());
        if exit_code == 0 {
            println!(
                "  {} {} {}",
                Status::Success.colored_symbol(),
                step.as_str().green(),
                elapsed.bright_black()
            );
        } else {
            println!(
                "  {} {} exited with code {} {}",
                Status::Error.colored_symbol(),
                step.as_str().red().bold(),
                exit_code.to_string().red().bold(),
                elapsed.bright_black()
            );
        }
    }

    fn build_skipped(&self, package: &Package) {
        self.announce(package);
        println!(
            "  {} {}",
            Status::Info.colored_symbol(),
            "build skipped".bright_black()
        );
    }
}

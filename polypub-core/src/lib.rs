//! Core library for publishing workspace packages in dependency order.

pub mod config;
pub mod confirm;
pub mod discovery;
pub mod error;
pub mod git;
pub mod graph;
pub mod manifest;
pub mod options;
pub mod package;
pub mod pipeline;
pub mod plan;
pub mod resolve;
pub mod scanner;

pub use config::Config;
pub use confirm::{ConfirmationGate, Prompt};
pub use discovery::select_manifests;
pub use error::{Error, Result};
pub use git::{GitWorkingTree, WorkingTree};
pub use graph::{DependencyGraph, OrderingResult, PriorityTable};
pub use manifest::{PackageManifest, WorkspacePatterns};
pub use options::{validate_tag, Access, RunMode, RunOptions};
pub use package::Package;
pub use pipeline::{
    CommandRunner, PipelineReporter, PipelineRunner, ProcessRunner, RunReport, RunState, Step,
    StepCommand, StepFailure, StepRecord,
};
pub use plan::{PublishPlan, Selection};
pub use resolve::{ExcludePolicy, TargetResolver};
pub use scanner::Scanner;

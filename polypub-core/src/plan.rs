//! Planning: scan, order and select targets before anything runs.

use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::{DependencyGraph, OrderingResult, PriorityTable};
use crate::package::Package;
use crate::resolve::{ExcludePolicy, TargetResolver};
use crate::scanner::Scanner;

/// Package filters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub only: Vec<String>,
    pub exclude: Vec<String>,
    pub strict_exclude: bool,
}

/// Everything decided before the first subprocess starts.
#[derive(Debug)]
pub struct PublishPlan {
    pub graph: DependencyGraph,
    pub ordering: OrderingResult,
    pub targets: Vec<String>,
}

impl PublishPlan {
    /// Scans `root` and plans a run.
    ///
    /// # Errors
    ///
    /// Scanner errors, `EmptyWorkspace`, `CircularDependency` when the
    /// config asks for strict cycles, resolver errors and `NoTargets`.
    pub fn build(root: &Path, config: &Config, selection: &Selection) -> Result<Self> {
        let packages = Scanner::new(root).scan()?;
        if packages.is_empty() {
            return Err(Error::EmptyWorkspace(root.to_path_buf()));
        }
        Self::from_packages(packages, config, selection)
    }

    pub fn from_packages(
        packages: Vec<Package>,
        config: &Config,
        selection: &Selection,
    ) -> Result<Self> {
        let graph = DependencyGraph::new(packages)?;
        let priority = PriorityTable::new(config.priority.iter().cloned());
        let ordering = graph.order(&priority);

        if ordering.degraded {
            let members = graph.cycle_members().join(", ");
            if config.strict_cycles {
                return Err(Error::CircularDependency(members));
            }
            tracing::warn!(
                packages = %members,
                "dependency cycle detected, falling back to priority order; \
                 dependents may be published before their dependencies"
            );
        }

        let policy = if selection.strict_exclude || config.strict_exclude {
            ExcludePolicy::Strict
        } else {
            ExcludePolicy::Skip
        };
        let targets = TargetResolver::new(&graph, &ordering.order)
            .with_policy(policy)
            .resolve(&selection.only, &selection.exclude)?;
        if targets.is_empty() {
            return Err(Error::NoTargets);
        }

        Ok(Self {
            graph,
            ordering,
            targets,
        })
    }

    /// Target packages in publish order.
    pub fn target_packages(&self) -> Vec<&Package> {
        self.targets
            .iter()
            .filter_map(|name| self.graph.get_package(name))
            .collect()
    }
}

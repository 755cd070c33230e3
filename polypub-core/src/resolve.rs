//! Target selection from `--only` and `--exclude`.

use std::collections::{BTreeSet, HashSet};

use crate::error::{Error, Result};
use crate::graph::DependencyGraph;

/// What to do when an excluded package is needed by an `--only` seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExcludePolicy {
    /// Drop it from the targets and carry on.
    #[default]
    Skip,
    /// Refuse to resolve.
    Strict,
}

/// Resolves the packages a run acts on, in publish order.
pub struct TargetResolver<'a> {
    graph: &'a DependencyGraph,
    order: &'a [String],
    policy: ExcludePolicy,
}

impl<'a> TargetResolver<'a> {
    pub fn new(graph: &'a DependencyGraph, order: &'a [String]) -> Self {
        Self {
            graph,
            order,
            policy: ExcludePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ExcludePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the targets in publish order.
    ///
    /// With a non-empty `only`, targets are the seeds plus every package
    /// they transitively depend on. `exclude` is removed last; names in it
    /// that are not workspace packages are ignored. An empty result is
    /// returned as-is for the caller to reject.
    ///
    /// # Errors
    ///
    /// `UnknownPackages` listing every `only` name that is not in the
    /// workspace, or `ExcludedDependency` under [`ExcludePolicy::Strict`].
    pub fn resolve(&self, only: &[String], exclude: &[String]) -> Result<Vec<String>> {
        let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();

        let candidates: Vec<&String> = if only.is_empty() {
            self.order.iter().collect()
        } else {
            let closure = self.closure(only)?;
            if self.policy == ExcludePolicy::Strict {
                self.check_excluded(only, &closure, &excluded)?;
            }
            self.order
                .iter()
                .filter(|name| closure.contains(name.as_str()))
                .collect()
        };

        Ok(candidates
            .into_iter()
            .filter(|name| !excluded.contains(name.as_str()))
            .cloned()
            .collect())
    }

    fn closure(&self, only: &[String]) -> Result<HashSet<String>> {
        let missing: BTreeSet<&str> = only
            .iter()
            .filter(|name| !self.graph.contains(name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnknownPackages {
                names: missing.into_iter().map(str::to_string).collect(),
                available: self.graph.available(),
            });
        }

        let mut closure: HashSet<String> = only.iter().cloned().collect();
        for seed in only {
            closure.extend(self.graph.all_dependencies(seed)?);
        }
        Ok(closure)
    }

    fn check_excluded(
        &self,
        only: &[String],
        closure: &HashSet<String>,
        excluded: &HashSet<&str>,
    ) -> Result<()> {
        let seeds: HashSet<&str> = only.iter().map(String::as_str).collect();
        for name in self.order {
            if !closure.contains(name) || seeds.contains(name.as_str()) {
                continue;
            }
            if !excluded.contains(name.as_str()) {
                continue;
            }
            let dependents = self.graph.dependents(name)?;
            let required_by = self
                .order
                .iter()
                .filter(|candidate| closure.contains(*candidate))
                .find(|candidate| {
                    !excluded.contains(candidate.as_str()) && dependents.contains(*candidate)
                })
                .cloned();
            if let Some(required_by) = required_by {
                return Err(Error::ExcludedDependency {
                    package: name.clone(),
                    required_by,
                });
            }
        }
        Ok(())
    }
}

//! Dependency graph management using petgraph.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::{Error, Result};
use crate::package::Package;

/// Tie-break ranks for the orderer.
///
/// Listed names sort first, in list order. Every other name shares the
/// next rank and falls back to alphabetical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityTable {
    ranks: HashMap<String, usize>,
}

impl PriorityTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ranks = HashMap::new();
        for name in names {
            let next = ranks.len();
            ranks.entry(name.into()).or_insert(next);
        }
        Self { ranks }
    }

    #[inline]
    pub fn sort_key<'a>(&self, name: &'a str) -> (usize, &'a str) {
        let rank = self.ranks.get(name).copied().unwrap_or(self.ranks.len());
        (rank, name)
    }
}

/// A publish order. `degraded` is set when the graph has a cycle and
/// `order` is the plain priority sort instead of a topological one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingResult {
    pub order: Vec<String>,
    pub degraded: bool,
}

/// Directed graph of internal dependencies. Edges point from a dependency
/// to its dependent.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
    packages: HashMap<NodeIndex, Package>,
}

impl DependencyGraph {
    /// Creates a dependency graph from a list of packages.
    ///
    /// Dependency names that are not workspace packages are dropped.
    /// Self-edges and repeated edges collapse.
    ///
    /// # Errors
    ///
    /// Returns an error if two packages share a name.
    pub fn new(packages: Vec<Package>) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        let mut packages_map = HashMap::new();

        for package in packages {
            if let Some(existing) = node_map.get(&package.name) {
                let first: &Package = &packages_map[existing];
                return Err(Error::DuplicatePackage {
                    name: package.name.clone(),
                    first: first.path.clone(),
                    second: package.path.clone(),
                });
            }
            let node = graph.add_node(package.name.clone());
            node_map.insert(package.name.clone(), node);
            packages_map.insert(node, package);
        }

        for (dependent, package) in &packages_map {
            for dep_name in &package.deps {
                if dep_name == &package.name {
                    continue;
                }
                if let Some(dependency) = node_map.get(dep_name) {
                    graph.update_edge(*dependency, *dependent, ());
                }
            }
        }

        Ok(Self {
            graph,
            node_map,
            packages: packages_map,
        })
    }

    /// Orders packages so every dependency precedes its dependents.
    ///
    /// Kahn's algorithm, always taking the ready node with the smallest
    /// priority key. On a cycle the result holds every package sorted by
    /// that key alone and is marked degraded.
    pub fn order(&self, priority: &PriorityTable) -> OrderingResult {
        let (order, complete) = self.kahn(priority);
        if complete {
            return OrderingResult {
                order,
                degraded: false,
            };
        }

        let mut fallback: Vec<&str> = self.graph.node_weights().map(String::as_str).collect();
        fallback.sort_by(|a, b| priority.sort_key(a).cmp(&priority.sort_key(b)));
        OrderingResult {
            order: fallback.into_iter().map(str::to_string).collect(),
            degraded: true,
        }
    }

    /// Packages Kahn's algorithm could not emit: cycle members and
    /// everything downstream of a cycle. Sorted by name.
    pub fn cycle_members(&self) -> Vec<String> {
        let (emitted, _) = self.kahn(&PriorityTable::default());
        let emitted: HashSet<&str> = emitted.iter().map(String::as_str).collect();
        let mut stuck: Vec<String> = self
            .graph
            .node_weights()
            .filter(|name| !emitted.contains(name.as_str()))
            .cloned()
            .collect();
        stuck.sort();
        stuck
    }

    fn kahn(&self, priority: &PriorityTable) -> (Vec<String>, bool) {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                let degree = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                (idx, degree)
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<((usize, &str), NodeIndex)>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| Reverse((priority.sort_key(&self.graph[*idx]), *idx)))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse((_, idx))) = ready.pop() {
            order.push(self.graph[idx].clone());
            for dependent in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse((priority.sort_key(&self.graph[dependent]), dependent)));
                    }
                }
            }
        }

        let complete = order.len() == self.graph.node_count();
        (order, complete)
    }

    /// Retrieves a package by name.
    #[inline]
    pub fn get_package(&self, name: &str) -> Option<&Package> {
        self.node_map
            .get(name)
            .and_then(|idx| self.packages.get(idx))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn node(&self, package_name: &str) -> Result<NodeIndex> {
        self.node_map
            .get(package_name)
            .copied()
            .ok_or_else(|| Error::UnknownPackages {
                names: vec![package_name.to_string()],
                available: self.available(),
            })
    }

    /// Comma-separated package names, sorted.
    pub fn available(&self) -> String {
        let mut names: Vec<&str> = self.node_map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.join(", ")
    }

    /// Returns direct dependencies of a package, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the package is not found in the graph.
    pub fn dependencies(&self, package_name: &str) -> Result<Vec<String>> {
        let node = self.node(package_name)?;
        let mut deps: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|idx| self.graph[idx].clone())
            .collect();
        deps.sort();
        Ok(deps)
    }

    /// Returns direct dependents of a package (packages that depend on it), sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the package is not found in the graph.
    pub fn dependents(&self, package_name: &str) -> Result<Vec<String>> {
        let node = self.node(package_name)?;
        let mut dependents: Vec<String> = self
            .graph
            .neighbors_directed(node, Direction::Outgoing)
            .map(|idx| self.graph[idx].clone())
            .collect();
        dependents.sort();
        Ok(dependents)
    }

    /// Returns all transitive dependencies of a package, excluding itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the package is not found in the graph.
    pub fn all_dependencies(&self, package_name: &str) -> Result<HashSet<String>> {
        let mut result = HashSet::new();
        let mut stack = vec![package_name.to_string()];

        while let Some(current) = stack.pop() {
            if !result.insert(current.clone()) {
                continue;
            }
            for dep in self.dependencies(&current)? {
                if !result.contains(&dep) {
                    stack.push(dep);
                }
            }
        }

        result.remove(package_name);
        Ok(result)
    }
}

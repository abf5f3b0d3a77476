//! Dependency graph data structures produced by the builder

use super::package::Package;
use indexmap::{IndexMap, IndexSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Insertion-ordered set of packages
pub type PackageSet = IndexSet<Package>;

/// Directed graph mapping each visited package to the packages it imports.
///
/// Keys are packages that were walked. Inserting an edge never creates the
/// target as a key; only the builder decides when a package becomes a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Graph {
    nodes: IndexMap<Package, PackageSet>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the package has been established as a node
    pub fn has_node(&self, pkg: &str) -> bool {
        self.nodes.contains_key(pkg)
    }

    /// Get the outgoing edge set of a package, creating an empty node if needed
    pub fn node_mut(&mut self, pkg: Package) -> &mut PackageSet {
        self.nodes.entry(pkg).or_default()
    }

    /// Outgoing edges of a package, if it is a node
    pub fn edges(&self, pkg: &str) -> Option<&PackageSet> {
        self.nodes.get(pkg)
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over nodes and their edge sets in visit order
    pub fn iter(&self) -> impl Iterator<Item = (&Package, &PackageSet)> {
        self.nodes.iter()
    }

    /// Iterate over the node keys in visit order
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.nodes.keys()
    }

    /// Convert to a petgraph graph for use with its algorithms.
    ///
    /// Edge targets that are not nodes themselves still get a vertex.
    pub fn to_petgraph(&self) -> DiGraph<Package, ()> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&Package, NodeIndex> = HashMap::new();

        for pkg in self.nodes.keys() {
            indices.insert(pkg, graph.add_node(pkg.clone()));
        }

        for (from, targets) in &self.nodes {
            let from_index = indices[from];
            for to in targets {
                let to_index = *indices
                    .entry(to)
                    .or_insert_with(|| graph.add_node(to.clone()));
                graph.add_edge(from_index, to_index, ());
            }
        }

        graph
    }

    /// Import cycles: strongly connected components with more than one
    /// package, plus packages that import themselves.
    pub fn cycles(&self) -> Vec<Vec<Package>> {
        let graph = self.to_petgraph();
        let mut cycles: Vec<Vec<Package>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&index| graph.contains_edge(index, index))
            })
            .map(|component| {
                let mut members: Vec<Package> =
                    component.into_iter().map(|index| graph[index].clone()).collect();
                members.sort();
                members
            })
            .collect();
        cycles.sort();
        cycles
    }
}

/// Metadata fixed for a package the first time it is visited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyInfo {
    /// Lines across the package's source files
    pub lines_of_code: usize,
}

/// Result of a dependency build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Map of package -> packages it imports
    pub forward: Graph,
    /// Packages rejected by the filter
    pub ignored: PackageSet,
    /// Per-node metadata
    pub info: IndexMap<Package, DependencyInfo>,
}

impl Dependencies {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of packages in the graph
    pub fn node_count(&self) -> usize {
        self.forward.node_count()
    }

    /// Whether a package was walked
    pub fn contains(&self, pkg: &str) -> bool {
        self.forward.has_node(pkg)
    }

    /// Sum of lines over every walked package
    pub fn total_lines_of_code(&self) -> usize {
        self.info.values().map(|info| info.lines_of_code).sum()
    }
}

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::FileFacts;
use crate::resolver::ImportResolver;

/// A resolved file-level import edge. Duplicate edges between the same pair
/// are retained so edge counts stay accurate when a file imports the same
/// target through several statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Adjacency sets for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphNode {
    pub imports_from: BTreeSet<String>,
    pub imported_by: BTreeSet<String>,
}

/// Inbound/outbound edge counts for a file; only computed when total > 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coupling {
    pub inbound: usize,
    pub outbound: usize,
    pub total: usize,
}

/// File-level dependency graph with adjacency sets.
///
/// Immutable after construction. Invariant: for every edge `(a, b)`,
/// `b ∈ nodes[a].imports_from` and `a ∈ nodes[b].imported_by`. Unresolved
/// imports contribute no edge.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: BTreeMap<String, GraphNode>,
    pub edges: Vec<Edge>,
}

impl DependencyGraph {
    /// Build the graph from the completed per-file facts.
    ///
    /// Every known path becomes a node; each raw import path is resolved
    /// against the known-path set and successful resolutions become edges.
    /// Resolution misses are silently dropped.
    pub fn build(facts: &BTreeMap<String, FileFacts>) -> Self {
        let resolver = ImportResolver::new(facts.keys().cloned().collect());

        let mut graph = DependencyGraph::default();
        for path in facts.keys() {
            graph.nodes.insert(path.clone(), GraphNode::default());
        }

        for (from, file) in facts {
            for raw in &file.import_paths {
                let Some(to) = resolver.resolve(raw, from) else {
                    continue;
                };
                graph.add_edge(from, &to);
            }
        }

        graph
    }

    fn add_edge(&mut self, from: &str, to: &str) {
        if let Some(node) = self.nodes.get_mut(from) {
            node.imports_from.insert(to.to_string());
        }
        if let Some(node) = self.nodes.get_mut(to) {
            node.imported_by.insert(from.to_string());
        }
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// Files with no inbound resolved edges. Candidates for dead-code
    /// classification or roots; the classifier decides which.
    pub fn orphans(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.imported_by.is_empty())
            .map(|(p, _)| p.as_str())
            .collect()
    }

    /// Files that are imported but import nothing themselves: they exist
    /// only to be imported (leaf exports).
    pub fn leaf_exports(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| !n.imported_by.is_empty() && n.imports_from.is_empty())
            .map(|(p, _)| p.as_str())
            .collect()
    }

    /// Per-file coupling (inbound + outbound), only for files with edges.
    pub fn coupling(&self) -> BTreeMap<String, Coupling> {
        self.nodes
            .iter()
            .filter_map(|(path, node)| {
                let inbound = node.imported_by.len();
                let outbound = node.imports_from.len();
                let total = inbound + outbound;
                if total == 0 {
                    return None;
                }
                Some((
                    path.clone(),
                    Coupling {
                        inbound,
                        outbound,
                        total,
                    },
                ))
            })
            .collect()
    }

    pub fn node(&self, path: &str) -> Option<&GraphNode> {
        self.nodes.get(path)
    }

    pub fn file_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

use std::collections::BTreeSet;

use crate::model::graph::DependencyGraph;

/// An import cycle as the path that closed it: `[a, b, a]` for a two-file
/// cycle, `[a, a]` for a self-import.
pub type Cycle = Vec<String>;

/// Detect import cycles by depth-first traversal.
///
/// Every file is used as a start node in path order; neighbors are visited
/// in path order too, so the reported cycles are deterministic for a given
/// graph. A back edge into a file on the current path closes a cycle; files
/// already fully explored are never re-entered. Detection stops after `cap`
/// cycles.
pub fn find_cycles(graph: &DependencyGraph, cap: usize) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();

    for start in graph.nodes.keys() {
        if cycles.len() >= cap {
            break;
        }
        if !visited.contains(start.as_str()) {
            let mut visiting = BTreeSet::new();
            dfs(
                graph,
                start,
                &[],
                &mut visiting,
                &mut visited,
                &mut cycles,
                cap,
            );
        }
    }
    cycles
}

fn dfs<'a>(
    graph: &'a DependencyGraph,
    node: &'a str,
    path: &[&'a str],
    visiting: &mut BTreeSet<&'a str>,
    visited: &mut BTreeSet<&'a str>,
    cycles: &mut Vec<Cycle>,
    cap: usize,
) {
    if cycles.len() >= cap {
        return;
    }
    if visiting.contains(node) {
        // Back edge: the cycle is the path suffix from the first occurrence
        // of `node`, closed by `node` itself.
        if let Some(pos) = path.iter().position(|p| *p == node) {
            let mut cycle: Cycle = path[pos..].iter().map(|p| p.to_string()).collect();
            cycle.push(node.to_string());
            cycles.push(cycle);
        }
        return;
    }
    if visited.contains(node) {
        return;
    }

    visiting.insert(node);
    let mut next_path: Vec<&str> = path.to_vec();
    next_path.push(node);

    if let Some(graph_node) = graph.node(node) {
        for neighbor in &graph_node.imports_from {
            dfs(
                graph,
                neighbor,
                &next_path,
                visiting,
                visited,
                cycles,
                cap,
            );
        }
    }

    visiting.remove(node);
    visited.insert(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileFacts, Language};
    use std::collections::BTreeMap;

    fn graph(files: &[(&str, &[&str])]) -> DependencyGraph {
        let facts: BTreeMap<String, FileFacts> = files
            .iter()
            .map(|(path, imports)| {
                let mut f = FileFacts::new(*path, Language::JavaScript);
                for i in *imports {
                    f.import_paths.insert(i.to_string());
                }
                (path.to_string(), f)
            })
            .collect();
        DependencyGraph::build(&facts)
    }

    #[test]
    fn two_file_cycle_reported_once() {
        let g = graph(&[("a.js", &["./b"]), ("b.js", &["./a"])]);
        let cycles = find_cycles(&g, 5);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a.js", "b.js", "a.js"]);
    }

    #[test]
    fn self_import_is_a_minimal_cycle() {
        let g = graph(&[("a.js", &["./a"])]);
        let cycles = find_cycles(&g, 5);
        assert_eq!(cycles, vec![vec!["a.js".to_string(), "a.js".to_string()]]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let g = graph(&[("a.js", &["./b"]), ("b.js", &["./c"]), ("c.js", &[])]);
        assert!(find_cycles(&g, 5).is_empty());
    }

    #[test]
    fn three_file_cycle_path_is_closed() {
        let g = graph(&[("a.js", &["./b"]), ("b.js", &["./c"]), ("c.js", &["./a"])]);
        let cycles = find_cycles(&g, 5);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a.js", "b.js", "c.js", "a.js"]);
        assert_eq!(cycles[0].first(), cycles[0].last());
    }

    #[test]
    fn cap_limits_reported_cycles() {
        // Three independent two-file cycles.
        let g = graph(&[
            ("a.js", &["./b"]),
            ("b.js", &["./a"]),
            ("c.js", &["./d"]),
            ("d.js", &["./c"]),
            ("e.js", &["./f"]),
            ("f.js", &["./e"]),
        ]);
        assert_eq!(find_cycles(&g, 2).len(), 2);
        assert_eq!(find_cycles(&g, 5).len(), 3);
    }

    #[test]
    fn deterministic_across_runs() {
        let g = graph(&[
            ("x.js", &["./y"]),
            ("y.js", &["./x"]),
            ("m.js", &["./n"]),
            ("n.js", &["./m"]),
        ]);
        assert_eq!(find_cycles(&g, 5), find_cycles(&g, 5));
    }
}

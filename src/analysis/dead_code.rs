use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::graph::DependencyGraph;
use crate::model::FileFacts;

/// Default file stems that mark conventional entry points; never flagged
/// dead. Overridable through configuration.
pub const ENTRY_STEMS: &[&str] =
    &["index", "main", "app", "server", "cli", "lib", "mod", "__init__"];

/// File stems that, combined with imports plus exports, mark a re-export
/// aggregator.
const AGGREGATOR_STEMS: &[&str] = &["index", "lib", "main", "mod", "__init__"];

/// Dead-code classification buckets. Each file lands in at most one bucket;
/// test files are carved out first, then the remaining buckets are checked
/// in declaration order with the first match winning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeadCodeReport {
    /// Files matched by test naming conventions; reported, never flagged.
    pub test_files: Vec<String>,
    /// Re-export aggregators (barrel files) found while classifying.
    pub aggregators: Vec<String>,
    /// Files that export names nobody imports.
    pub unused_exports: Vec<String>,
    /// Files with no importers and no imports of their own.
    pub orphaned_files: Vec<String>,
    /// Leaf files with exactly one importer; weak evidence, listed separately.
    pub possibly_dead: Vec<String>,
}

pub fn classify(
    facts: &BTreeMap<String, FileFacts>,
    graph: &DependencyGraph,
    entry_stems: &[String],
) -> DeadCodeReport {
    let mut report = DeadCodeReport::default();

    let test_files: BTreeSet<&str> = facts
        .keys()
        .filter(|path| is_test_file(path))
        .map(|p| p.as_str())
        .collect();
    report.test_files = test_files.iter().map(|p| p.to_string()).collect();

    // An aggregator "covers" the files it re-exports: being imported only by
    // an aggregator still counts as being reachable through it, and the
    // aggregator's own import is tagged rather than counted as a consumer.
    let mut aggregators: BTreeSet<&str> = BTreeSet::new();
    let mut covered: BTreeSet<&str> = BTreeSet::new();
    for (path, file) in facts {
        if !is_aggregator(path, file) {
            continue;
        }
        aggregators.insert(path.as_str());
        report.aggregators.push(path.clone());
        if let Some(node) = graph.node(path) {
            for target in &node.imports_from {
                covered.insert(target.as_str());
            }
        }
    }

    for (path, file) in facts {
        if test_files.contains(path.as_str()) {
            continue;
        }
        let Some(node) = graph.node(path) else {
            continue;
        };
        // Importers that are actual consumers, not re-export barrels.
        let real_importers = node
            .imported_by
            .iter()
            .filter(|p| !aggregators.contains(p.as_str()))
            .count();
        let entry = is_entry_point(path, entry_stems);
        let reachable = covered.contains(path.as_str());

        if !file.exported_names.is_empty()
            && real_importers == 0
            && !reachable
            && !entry
            && !is_config_file(path)
        {
            report.unused_exports.push(path.clone());
        } else if node.imported_by.is_empty() && node.imports_from.is_empty() && !entry {
            report.orphaned_files.push(path.clone());
        } else if real_importers == 1 && node.imports_from.is_empty() && !reachable {
            report.possibly_dead.push(path.clone());
        }
    }

    report
}

/// Test naming conventions across the supported ecosystems.
pub fn is_test_file(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_stem(file_name);

    file_name.contains(".test.")
        || file_name.contains(".spec.")
        || stem.ends_with("_test")
        || stem.ends_with("_spec")
        || stem.starts_with("test_")
        || path.split('/').any(|segment| {
            segment == "test" || segment == "tests" || segment == "__tests__"
        })
}

fn is_aggregator(path: &str, file: &FileFacts) -> bool {
    let stem = file_stem(path.rsplit('/').next().unwrap_or(path));
    AGGREGATOR_STEMS.contains(&stem)
        && !file.import_paths.is_empty()
        && !file.exported_names.is_empty()
}

fn is_entry_point(path: &str, entry_stems: &[String]) -> bool {
    let stem = file_stem(path.rsplit('/').next().unwrap_or(path));
    entry_stems.iter().any(|s| s == stem)
}

fn is_config_file(path: &str) -> bool {
    let stem = file_stem(path.rsplit('/').next().unwrap_or(path));
    stem.contains("config") || matches!(stem, "settings" | "setup" | "conf")
}

fn file_stem(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::discovery::{self, DiscoveredFile};
use crate::extract;
use crate::metrics::{self, FileMetrics, Hotspot, SizeReport};
use crate::model::graph::{Coupling, DependencyGraph};
use crate::model::{FileFacts, ParseFailure};
use crate::parser;

pub mod cycles;
pub mod dead_code;
pub mod duplicates;

pub use cycles::Cycle;
pub use dead_code::DeadCodeReport;
pub use duplicates::DuplicateGroup;

/// Everything one analysis run produces. Computed once, read-only afterwards.
#[derive(Debug, Serialize)]
pub struct ProjectAnalysis {
    pub facts: BTreeMap<String, FileFacts>,
    pub metrics: BTreeMap<String, FileMetrics>,
    pub graph: DependencyGraph,
    pub coupling: BTreeMap<String, Coupling>,
    pub cycles: Vec<Cycle>,
    pub duplicates: Vec<DuplicateGroup>,
    pub dead_code: DeadCodeReport,
    pub hotspots: Vec<Hotspot>,
    pub sizes: SizeReport,
    pub outliers: FunctionOutliers,
    pub top_identifiers: Vec<IdentifierCount>,
    pub totals: Totals,
    pub parse_failures: Vec<ParseFailure>,
}

/// Function-shape outliers across the project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionOutliers {
    /// Functions longer than 50 lines, longest first.
    pub long_functions: Vec<OutlierFunction>,
    /// Functions taking more than 5 parameters, widest first.
    pub many_params: Vec<OutlierFunction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierFunction {
    pub file: String,
    pub signature: String,
    pub line_count: usize,
    pub param_count: usize,
}

/// One entry in the project-wide identifier-frequency ranking.
#[derive(Debug, Clone, Serialize)]
pub struct IdentifierCount {
    pub name: String,
    pub count: usize,
}

/// Project-wide aggregate counters.
#[derive(Debug, Default, Serialize)]
pub struct Totals {
    pub files: usize,
    pub functions: usize,
    pub types: usize,
    pub loc: usize,
    /// File counts keyed by language tag.
    pub by_language: BTreeMap<String, usize>,
}

/// Run the full pipeline over a project directory.
///
/// The per-file stage (read, parse, extract, measure) runs in parallel with
/// no shared state; each file yields its own facts or a recorded failure.
/// The graph, cycle, duplicate and dead-code stages run single-threaded over
/// the merged result and only start once every file has finished.
pub fn analyze_project(root: &Path, config: &AnalysisConfig) -> Result<ProjectAnalysis> {
    let files = discovery::discover_files(root, config)?;

    let outcomes: Vec<FileOutcome> = files.par_iter().map(analyze_file).collect();

    let mut facts: BTreeMap<String, FileFacts> = BTreeMap::new();
    let mut file_metrics: BTreeMap<String, FileMetrics> = BTreeMap::new();
    let mut parse_failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Analyzed(file_facts, m) => {
                file_metrics.insert(file_facts.path.clone(), m);
                facts.insert(file_facts.path.clone(), file_facts);
            }
            FileOutcome::Failed(failure) => parse_failures.push(failure),
        }
    }

    let graph = DependencyGraph::build(&facts);
    let coupling = graph.coupling();
    let cycles = cycles::find_cycles(&graph, config.max_cycles);
    let duplicates = duplicates::find_duplicates(&facts, config.max_duplicate_groups);
    let dead_code = dead_code::classify(&facts, &graph, &config.entry_stems);
    let hotspots = metrics::hotspots(&file_metrics);
    let sizes = metrics::file_sizes(&file_metrics);
    let outliers = function_outliers(&facts);
    let top_identifiers = top_identifiers(&facts);
    let totals = totals(&facts, &file_metrics);

    Ok(ProjectAnalysis {
        facts,
        metrics: file_metrics,
        graph,
        coupling,
        cycles,
        duplicates,
        dead_code,
        hotspots,
        sizes,
        outliers,
        top_identifiers,
        totals,
        parse_failures,
    })
}

fn function_outliers(facts: &BTreeMap<String, FileFacts>) -> FunctionOutliers {
    let mut outliers = FunctionOutliers::default();
    for (path, file) in facts {
        for function in &file.functions {
            let entry = OutlierFunction {
                file: path.clone(),
                signature: function.signature.clone(),
                line_count: function.line_count,
                param_count: function.param_count,
            };
            if function.line_count > 50 {
                outliers.long_functions.push(entry.clone());
            }
            if function.param_count > 5 {
                outliers.many_params.push(entry);
            }
        }
    }
    outliers
        .long_functions
        .sort_by(|a, b| b.line_count.cmp(&a.line_count).then_with(|| a.file.cmp(&b.file)));
    outliers
        .many_params
        .sort_by(|a, b| b.param_count.cmp(&a.param_count).then_with(|| a.file.cmp(&b.file)));
    outliers
}

/// Top 20 identifiers by total occurrence count across all files.
fn top_identifiers(facts: &BTreeMap<String, FileFacts>) -> Vec<IdentifierCount> {
    let mut merged: BTreeMap<&str, usize> = BTreeMap::new();
    for file in facts.values() {
        for (name, count) in &file.identifiers {
            *merged.entry(name.as_str()).or_insert(0) += count;
        }
    }
    let mut ranked: Vec<IdentifierCount> = merged
        .into_iter()
        .map(|(name, count)| IdentifierCount {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(20);
    ranked
}

enum FileOutcome {
    Analyzed(FileFacts, FileMetrics),
    Failed(ParseFailure),
}

fn analyze_file(file: &DiscoveredFile) -> FileOutcome {
    let source = match fs::read_to_string(&file.path) {
        Ok(source) => source,
        Err(err) => {
            return FileOutcome::Failed(ParseFailure {
                path: file.rel_path.clone(),
                message: format!("read failed: {}", err),
            })
        }
    };
    let tree = match parser::parse_source(file.language, &file.rel_path, &source) {
        Ok(tree) => tree,
        Err(err) => {
            return FileOutcome::Failed(ParseFailure {
                path: file.rel_path.clone(),
                message: format!("parse failed: {}", err),
            })
        }
    };
    let facts = extract::extract_facts(&tree, &source, &file.rel_path, file.language);
    let file_metrics = metrics::measure(&tree, &source);
    FileOutcome::Analyzed(facts, file_metrics)
}

fn totals(facts: &BTreeMap<String, FileFacts>, metrics: &BTreeMap<String, FileMetrics>) -> Totals {
    let mut totals = Totals {
        files: facts.len(),
        ..Default::default()
    };
    for file in facts.values() {
        totals.functions += file.functions.len();
        totals.types += file.types.len();
        *totals
            .by_language
            .entry(file.language.as_str().to_string())
            .or_insert(0) += 1;
    }
    totals.loc = metrics.values().map(|m| m.loc).sum();
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn end_to_end_over_small_project() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/app.js",
            "import { helper } from './util';\nexport function run() { return helper(); }\n",
        );
        write(
            dir.path(),
            "src/util.js",
            "export function helper() { return 1; }\n",
        );

        let analysis = analyze_project(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.totals.files, 2);
        assert_eq!(analysis.totals.functions, 2);
        assert_eq!(analysis.totals.by_language["javascript"], 2);
        assert!(analysis.graph.nodes["src/app.js"]
            .imports_from
            .contains("src/util.js"));
        assert_eq!(analysis.coupling["src/util.js"].inbound, 1);
        assert!(analysis.cycles.is_empty());
        assert!(analysis.parse_failures.is_empty());
    }

    #[test]
    fn unreadable_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ok.js", "let a = 1;\n");
        write(dir.path(), "bad.js", "let b = 2;\n");
        // Invalid UTF-8 makes read_to_string fail for this file only.
        fs::write(dir.path().join("bad.js"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let analysis = analyze_project(dir.path(), &AnalysisConfig::default()).unwrap();
        assert!(analysis.facts.contains_key("ok.js"));
        assert!(!analysis.facts.contains_key("bad.js"));
        assert_eq!(analysis.parse_failures.len(), 1);
        assert_eq!(analysis.parse_failures[0].path, "bad.js");
    }

    #[test]
    fn outliers_flag_long_and_wide_functions() {
        use crate::model::{FunctionFacts, Language};

        let mut file = FileFacts::new("src/big.js", Language::JavaScript);
        file.functions.push(FunctionFacts {
            signature: "huge(2)".to_string(),
            structural_hash: "0".repeat(16),
            line_count: 80,
            param_count: 2,
            start_line: 1,
        });
        file.functions.push(FunctionFacts {
            signature: "wide(7)".to_string(),
            structural_hash: "1".repeat(16),
            line_count: 10,
            param_count: 7,
            start_line: 90,
        });
        let mut facts = BTreeMap::new();
        facts.insert(file.path.clone(), file);

        let outliers = function_outliers(&facts);
        assert_eq!(outliers.long_functions.len(), 1);
        assert_eq!(outliers.long_functions[0].signature, "huge(2)");
        assert_eq!(outliers.many_params.len(), 1);
        assert_eq!(outliers.many_params[0].signature, "wide(7)");
    }

    #[test]
    fn identifier_ranking_merges_across_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.js", "function run(task) { return task; }\n");
        write(dir.path(), "b.js", "function stop(task) { return task; }\n");

        let analysis = analyze_project(dir.path(), &AnalysisConfig::default()).unwrap();
        let task = analysis
            .top_identifiers
            .iter()
            .find(|i| i.name == "task")
            .unwrap();
        assert_eq!(task.count, 4);
        // Sorted by total count, ties by name.
        assert!(analysis
            .top_identifiers
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn size_report_covers_every_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.js", "let a = 1;\n");
        write(dir.path(), "b.js", &"let b = 1;\n".repeat(60));

        let analysis = analyze_project(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.sizes.distribution.tiny, 1);
        assert_eq!(analysis.sizes.distribution.small, 1);
        assert_eq!(analysis.sizes.largest[0].file, "b.js");
    }

    #[test]
    fn mixed_language_totals() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.py", "def f():\n    return 1\n");
        write(dir.path(), "b.rs", "fn g() -> u8 { 2 }\n");

        let analysis = analyze_project(dir.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.totals.by_language["python"], 1);
        assert_eq!(analysis.totals.by_language["rust"], 1);
        assert!(analysis.totals.loc > 0);
    }
}

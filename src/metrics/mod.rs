use serde::{Deserialize, Serialize};

use crate::model::SyntaxNode;

/// Node kinds counted as branch points across the supported grammars.
const BRANCH_KINDS: &[&str] = &[
    "if_statement",
    "if_expression",
    "switch_statement",
    "case_statement",
    "conditional_expression",
    "match_expression",
    "switch_expression",
];

const LOOP_KINDS: &[&str] = &[
    "while_statement",
    "for_statement",
    "for_in_statement",
    "loop_expression",
    "while_expression",
    "for_expression",
];

/// Exact kinds only: the anonymous `return` keyword token inside a return
/// statement shares the substring and would double-count it.
const RETURN_KINDS: &[&str] = &["return_statement", "return_expression"];

/// Structural size and shape counters for one file. All tree counters come
/// from a single pre-order walk; the line counters come from the raw text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FileMetrics {
    pub node_count: usize,
    pub max_depth: usize,
    pub branch_count: usize,
    pub loop_count: usize,
    pub return_count: usize,
    /// Total lines, including blanks and comments.
    pub loc: usize,
    /// Non-blank, non-comment lines.
    pub sloc: usize,
    /// Nodes per line of code; 0 for empty files.
    pub density: f64,
}

pub fn measure(tree: &SyntaxNode, source: &str) -> FileMetrics {
    let mut metrics = FileMetrics::default();
    walk(tree, 1, &mut metrics);

    metrics.loc = source.lines().count();
    metrics.sloc = source
        .lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !trimmed.is_empty()
                && !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with("/*")
                && !trimmed.starts_with('*')
        })
        .count();
    metrics.density = if metrics.loc == 0 {
        0.0
    } else {
        metrics.node_count as f64 / metrics.loc as f64
    };
    metrics
}

fn walk(node: &SyntaxNode, depth: usize, metrics: &mut FileMetrics) {
    metrics.node_count += 1;
    metrics.max_depth = metrics.max_depth.max(depth);

    let kind = node.kind.as_str();
    if BRANCH_KINDS.contains(&kind) {
        metrics.branch_count += 1;
    }
    if LOOP_KINDS.contains(&kind) {
        metrics.loop_count += 1;
    }
    if RETURN_KINDS.contains(&kind) {
        metrics.return_count += 1;
    }

    for child in &node.children {
        walk(child, depth + 1, metrics);
    }
}

/// A file flagged as a complexity hotspot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hotspot {
    pub file: String,
    pub branches: usize,
    pub depth: usize,
    pub loc: usize,
}

/// Files whose branch count or tree depth exceeds the hotspot thresholds,
/// worst first.
pub fn hotspots<'a, I>(metrics: I) -> Vec<Hotspot>
where
    I: IntoIterator<Item = (&'a String, &'a FileMetrics)>,
{
    let mut found: Vec<Hotspot> = metrics
        .into_iter()
        .filter(|(_, m)| m.branch_count > 10 || m.max_depth > 8)
        .map(|(path, m)| Hotspot {
            file: path.clone(),
            branches: m.branch_count,
            depth: m.max_depth,
            loc: m.loc,
        })
        .collect();
    found.sort_by(|a, b| {
        (b.branches + b.depth)
            .cmp(&(a.branches + a.depth))
            .then_with(|| a.file.cmp(&b.file))
    });
    found
}

/// One file's line count, for size ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSize {
    pub file: String,
    pub lines: usize,
}

/// Line-count histogram over all files. Buckets: <50, <200, <500, <1000,
/// and everything above.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub tiny: usize,
    pub small: usize,
    pub medium: usize,
    pub large: usize,
    pub huge: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeReport {
    /// Top 10 files by line count, largest first.
    pub largest: Vec<FileSize>,
    pub distribution: SizeDistribution,
}

pub fn file_sizes<'a, I>(metrics: I) -> SizeReport
where
    I: IntoIterator<Item = (&'a String, &'a FileMetrics)>,
{
    let mut sizes: Vec<FileSize> = metrics
        .into_iter()
        .map(|(path, m)| FileSize {
            file: path.clone(),
            lines: m.loc,
        })
        .collect();

    let mut report = SizeReport::default();
    for size in &sizes {
        match size.lines {
            0..=49 => report.distribution.tiny += 1,
            50..=199 => report.distribution.small += 1,
            200..=499 => report.distribution.medium += 1,
            500..=999 => report.distribution.large += 1,
            _ => report.distribution.huge += 1,
        }
    }

    sizes.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.file.cmp(&b.file)));
    sizes.truncate(10);
    report.largest = sizes;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use crate::parser::parse_source;
    use std::collections::BTreeMap;

    fn measure_js(source: &str) -> FileMetrics {
        let tree = parse_source(Language::JavaScript, "m.js", source).unwrap();
        measure(&tree, source)
    }

    #[test]
    fn counts_branches_loops_and_returns() {
        let source = "function f(x) {\n  if (x > 0) {\n    for (let i = 0; i < x; i++) {}\n    return 1;\n  }\n  return 0;\n}\n";
        let m = measure_js(source);
        assert_eq!(m.branch_count, 1);
        assert_eq!(m.loop_count, 1);
        assert_eq!(m.return_count, 2);
        assert!(m.node_count > 10);
        assert!(m.max_depth > 3);
    }

    #[test]
    fn single_return_statement_counts_once() {
        // The return keyword token is a child of the statement node and must
        // not be counted as a second return.
        let m = measure_js("function f(x) { return x; }\n");
        assert_eq!(m.return_count, 1);
    }

    #[test]
    fn rust_return_expression_counts_once() {
        let source = "fn f(x: u8) -> u8 {\n    return x;\n}\n";
        let tree = parse_source(Language::Rust, "m.rs", source).unwrap();
        let m = measure(&tree, source);
        assert_eq!(m.return_count, 1);
    }

    #[test]
    fn loc_and_sloc_ignore_blanks_and_comments() {
        let source = "// header\n\nconst x = 1;\n# not js but counted as comment\nconst y = 2;\n";
        let m = measure_js(source);
        assert_eq!(m.loc, 5);
        assert_eq!(m.sloc, 2);
    }

    #[test]
    fn density_is_zero_for_empty_source() {
        let m = measure_js("");
        assert_eq!(m.loc, 0);
        assert_eq!(m.density, 0.0);
    }

    #[test]
    fn density_is_nodes_per_line() {
        let m = measure_js("const x = 1;\n");
        assert!((m.density - m.node_count as f64).abs() < f64::EPSILON);
    }

    #[test]
    fn hotspot_requires_threshold_breach() {
        let mut all = BTreeMap::new();
        all.insert(
            "calm.js".to_string(),
            FileMetrics {
                branch_count: 3,
                max_depth: 5,
                ..Default::default()
            },
        );
        all.insert(
            "branchy.js".to_string(),
            FileMetrics {
                branch_count: 12,
                max_depth: 6,
                loc: 100,
                ..Default::default()
            },
        );
        all.insert(
            "deep.js".to_string(),
            FileMetrics {
                branch_count: 2,
                max_depth: 9,
                loc: 40,
                ..Default::default()
            },
        );
        let spots = hotspots(&all);
        assert_eq!(spots.len(), 2);
        // branchy scores 18, deep scores 11
        assert_eq!(spots[0].file, "branchy.js");
        assert_eq!(spots[1].file, "deep.js");
    }

    #[test]
    fn file_sizes_rank_and_bucket() {
        let mut all = BTreeMap::new();
        for (name, loc) in [
            ("tiny.js", 10),
            ("small.js", 80),
            ("medium.js", 300),
            ("large.js", 700),
            ("huge.js", 1500),
        ] {
            all.insert(
                name.to_string(),
                FileMetrics {
                    loc,
                    ..Default::default()
                },
            );
        }
        let report = file_sizes(&all);
        assert_eq!(report.largest[0].file, "huge.js");
        assert_eq!(report.largest[0].lines, 1500);
        assert_eq!(report.distribution.tiny, 1);
        assert_eq!(report.distribution.small, 1);
        assert_eq!(report.distribution.medium, 1);
        assert_eq!(report.distribution.large, 1);
        assert_eq!(report.distribution.huge, 1);
    }

    #[test]
    fn largest_files_capped_at_ten() {
        let mut all = BTreeMap::new();
        for i in 0..15 {
            all.insert(
                format!("f{:02}.js", i),
                FileMetrics {
                    loc: 100 + i,
                    ..Default::default()
                },
            );
        }
        let report = file_sizes(&all);
        assert_eq!(report.largest.len(), 10);
        assert_eq!(report.largest[0].file, "f14.js");
    }

    #[test]
    fn rust_match_counts_as_branch() {
        let source = "fn f(x: u8) -> u8 {\n    match x {\n        0 => 1,\n        _ => 0,\n    }\n}\n";
        let tree = parse_source(Language::Rust, "m.rs", source).unwrap();
        let m = measure(&tree, source);
        assert_eq!(m.branch_count, 1);
    }
}

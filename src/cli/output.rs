use std::fmt::Write as _;

use serde::Serialize;

use super::OutputFormat;
use crate::analysis::ProjectAnalysis;

/// Format any serializable value; Text falls back to pretty JSON.
pub fn format_json<T: Serialize>(value: &T, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_default(),
        OutputFormat::Compact => serde_json::to_string(value).unwrap_or_default(),
        OutputFormat::Text => serde_json::to_string_pretty(value).unwrap_or_default(),
    }
}

pub fn format_summary(analysis: &ProjectAnalysis, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(analysis, format),
        OutputFormat::Compact => format_compact_summary(analysis),
        OutputFormat::Text => {
            let mut out = String::new();
            let t = &analysis.totals;
            let _ = writeln!(
                out,
                "{} files, {} functions, {} types, {} lines",
                t.files, t.functions, t.types, t.loc
            );
            for (language, count) in &t.by_language {
                let _ = writeln!(out, "  {:<12} {} files", language, count);
            }

            let _ = writeln!(
                out,
                "\nDependencies: {} edges, {} cycles reported",
                analysis.graph.edge_count(),
                analysis.cycles.len()
            );
            let _ = writeln!(
                out,
                "Duplicates: {} groups | Dead code: {} unused exports, {} orphaned, {} possibly dead",
                analysis.duplicates.len(),
                analysis.dead_code.unused_exports.len(),
                analysis.dead_code.orphaned_files.len(),
                analysis.dead_code.possibly_dead.len()
            );

            let dist = &analysis.sizes.distribution;
            let _ = writeln!(
                out,
                "Sizes: {} tiny, {} small, {} medium, {} large, {} huge",
                dist.tiny, dist.small, dist.medium, dist.large, dist.huge
            );
            if let Some(largest) = analysis.sizes.largest.first() {
                let _ = writeln!(out, "Largest file: {} ({} lines)", largest.file, largest.lines);
            }

            if !analysis.outliers.long_functions.is_empty() {
                let _ = writeln!(out, "\nLong functions (>50 lines):");
                for f in &analysis.outliers.long_functions {
                    let _ = writeln!(out, "  {} {} ({} lines)", f.file, f.signature, f.line_count);
                }
            }
            if !analysis.outliers.many_params.is_empty() {
                let _ = writeln!(out, "\nFunctions with many parameters (>5):");
                for f in &analysis.outliers.many_params {
                    let _ = writeln!(out, "  {} {}", f.file, f.signature);
                }
            }

            if !analysis.hotspots.is_empty() {
                let _ = writeln!(out, "\nComplexity hotspots:");
                for spot in &analysis.hotspots {
                    let _ = writeln!(
                        out,
                        "  {:<40} {} branches, depth {}, {} loc",
                        spot.file, spot.branches, spot.depth, spot.loc
                    );
                }
            }

            if !analysis.parse_failures.is_empty() {
                let _ = writeln!(out, "\nSkipped files:");
                for failure in &analysis.parse_failures {
                    let _ = writeln!(out, "  {}: {}", failure.path, failure.message);
                }
            }
            out
        }
    }
}

/// Dense single-screen summary: header totals, per-language breakdown,
/// top patterns and identifiers, duplicates, cycles, dead-code counts and
/// hotspots, each section a handful of short lines.
fn format_compact_summary(analysis: &ProjectAnalysis) -> String {
    let mut out = String::new();
    let t = &analysis.totals;
    let _ = writeln!(
        out,
        "=== {}f {}L {}fn {}ty ===",
        t.files,
        k(t.loc),
        t.functions,
        t.types
    );

    #[derive(Default)]
    struct LangAgg {
        files: usize,
        loc: usize,
        functions: usize,
    }
    let mut by_lang: std::collections::BTreeMap<&str, LangAgg> = std::collections::BTreeMap::new();
    for (path, facts) in &analysis.facts {
        let agg = by_lang.entry(facts.language.as_str()).or_default();
        agg.files += 1;
        agg.functions += facts.functions.len();
        agg.loc += analysis.metrics.get(path).map(|m| m.loc).unwrap_or(0);
    }
    let mut langs: Vec<_> = by_lang.into_iter().collect();
    langs.sort_by(|a, b| b.1.loc.cmp(&a.1.loc).then_with(|| a.0.cmp(b.0)));
    for (lang, agg) in langs {
        let ratio = if t.loc > 0 { agg.loc * 100 / t.loc } else { 0 };
        let tag: String = lang.chars().take(2).collect::<String>().to_uppercase();
        let _ = writeln!(
            out,
            "{} {}% {}f {}L {}fn",
            tag,
            ratio,
            agg.files,
            k(agg.loc),
            agg.functions
        );
    }

    let mut all_patterns: std::collections::BTreeMap<&str, usize> =
        std::collections::BTreeMap::new();
    for facts in analysis.facts.values() {
        for (name, count) in &facts.patterns {
            *all_patterns.entry(name.as_str()).or_insert(0) += count;
        }
    }
    let mut patterns: Vec<_> = all_patterns.into_iter().collect();
    patterns.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    patterns.truncate(12);
    if !patterns.is_empty() {
        out.push_str("=== calls ===\n");
        for (name, count) in patterns {
            let _ = writeln!(out, "{}x {}", count, name);
        }
    }

    if !analysis.top_identifiers.is_empty() {
        out.push_str("=== ids ===\n");
        for id in analysis.top_identifiers.iter().take(10) {
            let _ = writeln!(out, "{}x {}", id.count, id.name);
        }
    }

    if !analysis.duplicates.is_empty() {
        out.push_str("=== dups ===\n");
        for group in &analysis.duplicates {
            let sig = group
                .members
                .first()
                .map(|m| m.signature.as_str())
                .unwrap_or("?");
            let _ = writeln!(out, "{}x {}", group.count, sig);
        }
    }

    if !analysis.cycles.is_empty() {
        out.push_str("=== cycles ===\n");
        for cycle in &analysis.cycles {
            let _ = writeln!(out, "{}", cycle.join(" -> "));
        }
    }

    let d = &analysis.dead_code;
    let _ = writeln!(
        out,
        "dead u:{} o:{} p:{}",
        d.unused_exports.len(),
        d.orphaned_files.len(),
        d.possibly_dead.len()
    );

    if !analysis.hotspots.is_empty() {
        out.push_str("=== hotspots ===\n");
        for spot in analysis.hotspots.iter().take(5) {
            let _ = writeln!(out, "b:{} d:{} {}", spot.branches, spot.depth, spot.file);
        }
    }

    out
}

fn k(num: usize) -> String {
    if num >= 1000 {
        format!("{:.1}k", num as f64 / 1000.0)
    } else {
        num.to_string()
    }
}

pub fn format_graph(analysis: &ProjectAnalysis, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(&analysis.graph, format),
        OutputFormat::Text => {
            let mut out = String::new();
            for (path, node) in &analysis.graph.nodes {
                let coupling = node.imported_by.len() + node.imports_from.len();
                if coupling == 0 {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "{} (in {}, out {})",
                    path,
                    node.imported_by.len(),
                    node.imports_from.len()
                );
                for target in &node.imports_from {
                    let _ = writeln!(out, "  -> {}", target);
                }
            }
            out
        }
    }
}

pub fn format_cycles(analysis: &ProjectAnalysis, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(&analysis.cycles, format),
        OutputFormat::Text => {
            if analysis.cycles.is_empty() {
                return "No circular imports found.\n".to_string();
            }
            let mut out = String::new();
            for (i, cycle) in analysis.cycles.iter().enumerate() {
                let _ = writeln!(out, "{}. {}", i + 1, cycle.join(" -> "));
            }
            out
        }
    }
}

pub fn format_duplicates(analysis: &ProjectAnalysis, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(&analysis.duplicates, format),
        OutputFormat::Text => {
            if analysis.duplicates.is_empty() {
                return "No duplicated function structures found.\n".to_string();
            }
            let mut out = String::new();
            for group in &analysis.duplicates {
                let _ = writeln!(out, "{} occurrences ({})", group.count, group.hash);
                for member in &group.members {
                    let _ = writeln!(out, "  {} {}", member.file, member.signature);
                }
            }
            out
        }
    }
}

pub fn format_dead_code(analysis: &ProjectAnalysis, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json | OutputFormat::Compact => format_json(&analysis.dead_code, format),
        OutputFormat::Text => {
            let report = &analysis.dead_code;
            let mut out = String::new();
            let mut section = |title: &str, files: &[String], out: &mut String| {
                if files.is_empty() {
                    return;
                }
                let _ = writeln!(out, "{}:", title);
                for file in files {
                    let _ = writeln!(out, "  {}", file);
                }
            };
            section("Unused exports", &report.unused_exports, &mut out);
            section("Orphaned files", &report.orphaned_files, &mut out);
            section("Possibly dead (single consumer)", &report.possibly_dead, &mut out);
            if out.is_empty() {
                out.push_str("No dead code found.\n");
            }
            out
        }
    }
}

use std::path::Path;

use anyhow::Result;

use crate::analysis::{analyze_project, ProjectAnalysis};
use crate::config::AnalysisConfig;
use crate::model::Language;

use super::{output, Cli, OutputFormat};

/// Load the project config and apply command-line overrides on top.
fn load_config(root: &Path, cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = AnalysisConfig::load(root)?;
    config.include.extend_from_slice(&cli.include);
    config.exclude.extend_from_slice(&cli.exclude);
    if let Some(name) = &cli.lang {
        match language_from_name(name) {
            Some(language) => config.languages = vec![language],
            None => anyhow::bail!("unknown language: {}", name),
        }
    }
    Ok(config)
}

fn language_from_name(name: &str) -> Option<Language> {
    Language::from_extension(match name.to_lowercase().as_str() {
        "typescript" | "ts" => "ts",
        "javascript" | "js" => "js",
        "python" | "py" => "py",
        "rust" | "rs" => "rs",
        "java" => "java",
        _ => return None,
    })
}

fn run(root: &Path, cli: &Cli) -> Result<ProjectAnalysis> {
    let config = load_config(root, cli)?;
    analyze_project(root, &config)
}

pub fn run_analyze(root: &Path, cli: &Cli, format: &OutputFormat) -> Result<String> {
    let analysis = run(root, cli)?;
    Ok(output::format_summary(&analysis, format))
}

pub fn run_graph(root: &Path, cli: &Cli, format: &OutputFormat) -> Result<String> {
    let analysis = run(root, cli)?;
    Ok(output::format_graph(&analysis, format))
}

pub fn run_cycles(root: &Path, cli: &Cli, format: &OutputFormat) -> Result<String> {
    let analysis = run(root, cli)?;
    Ok(output::format_cycles(&analysis, format))
}

pub fn run_duplicates(root: &Path, cli: &Cli, format: &OutputFormat) -> Result<String> {
    let analysis = run(root, cli)?;
    Ok(output::format_duplicates(&analysis, format))
}

pub fn run_dead_code(root: &Path, cli: &Cli, format: &OutputFormat) -> Result<String> {
    let analysis = run(root, cli)?;
    Ok(output::format_dead_code(&analysis, format))
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

use crate::config::AnalysisConfig;
use crate::model::Language;

/// A source file selected for analysis.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// Path relative to the analysis root, `/`-separated on all platforms.
    /// This is the key used throughout the analysis.
    pub rel_path: String,
    pub language: Language,
}

/// Default exclude patterns for common build output, vendored code and
/// tooling directories.
const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "node_modules/", "dist/", "target/", "build/", "__pycache__/", ".venv/", ".idea/",
];

/// Discover source files in a project directory, respecting .gitignore.
///
/// Files larger than the configured size limit are skipped by the walker.
/// Results are sorted by relative path so downstream output is stable.
pub fn discover_files(root: &Path, config: &AnalysisConfig) -> Result<Vec<DiscoveredFile>> {
    let mut files = Vec::new();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false) // don't skip dot-prefixed dirs entirely (let gitignore decide)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .parents(true)
        .max_filesize(Some(config.max_file_size));

    {
        let mut overrides = ignore::overrides::OverrideBuilder::new(root);
        for pattern in DEFAULT_EXCLUDE_PATTERNS {
            overrides
                .add(&format!("!{}", pattern))
                .context("invalid default exclude pattern")?;
        }
        for pattern in &config.exclude {
            overrides
                .add(&format!("!{}", pattern))
                .context("invalid exclude pattern")?;
        }
        for pattern in &config.include {
            overrides.add(pattern).context("invalid include pattern")?;
        }
        builder.overrides(overrides.build().context("failed to build overrides")?);
    }

    for entry in builder.build() {
        let entry = entry.context("error reading directory entry")?;

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();

        let language = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => match Language::from_extension(ext) {
                Some(lang) => lang,
                None => continue, // skip unsupported files
            },
            None => continue,
        };

        if !config.languages.is_empty() && !config.languages.contains(&language) {
            continue;
        }

        let rel = path.strip_prefix(root).unwrap_or(path);
        let rel_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(DiscoveredFile {
            path: path.to_path_buf(),
            rel_path,
            language,
        });
    }

    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}

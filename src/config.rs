use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::dead_code::ENTRY_STEMS;
use crate::model::Language;

/// Project analysis configuration, loaded from `codemap.toml` when present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Glob patterns to include; empty means all supported files.
    pub include: Vec<String>,
    /// Glob patterns to exclude on top of ignore files.
    pub exclude: Vec<String>,
    /// Filter to specific languages; empty means all supported.
    pub languages: Vec<Language>,
    /// File stems never flagged as dead code.
    pub entry_stems: Vec<String>,
    /// Files larger than this are skipped (bytes).
    pub max_file_size: u64,
    /// Stop cycle detection after this many cycles.
    pub max_cycles: usize,
    /// Report at most this many duplicate groups.
    pub max_duplicate_groups: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            include: Vec::new(),
            exclude: Vec::new(),
            languages: Vec::new(),
            entry_stems: ENTRY_STEMS.iter().map(|s| s.to_string()).collect(),
            max_file_size: 200 * 1024,
            max_cycles: 5,
            max_duplicate_groups: 10,
        }
    }
}

impl AnalysisConfig {
    /// Load `codemap.toml` from the project root, falling back to defaults
    /// when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("codemap.toml");
        if !path.exists() {
            return Ok(AnalysisConfig::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Java,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Java => "java",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "tsx" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "py" | "pyi" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            "java" => Some(Language::Java),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// An owned, immutable syntax tree node.
///
/// Trees are produced once by the parser layer and never mutated. Node text
/// is not duplicated per node; it is resolved through the span against the
/// file's source, which every extraction pass carries alongside the tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: String,
    pub span: Span,
    /// 1-based line of the node's first byte.
    pub start_line: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// The source text covered by this node.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.start..self.span.end).unwrap_or("")
    }

    /// Number of text lines this node spans (at least 1).
    pub fn line_count(&self, source: &str) -> usize {
        self.text(source).lines().count().max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Struct,
    Class,
    Enum,
    Interface,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Class => "class",
            TypeKind::Enum => "enum",
            TypeKind::Interface => "interface",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One extracted function definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionFacts {
    /// `name(paramCount)`, name falling back to the language's anonymous marker.
    pub signature: String,
    /// Digest of the function's node-kind sequence (identifiers and comments
    /// excluded), used for structural duplicate grouping.
    pub structural_hash: String,
    pub line_count: usize,
    pub param_count: usize,
    pub start_line: usize,
}

/// One extracted type definition (class, struct, enum, interface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeFacts {
    pub kind: TypeKind,
    pub occurrences: usize,
    pub start_line: usize,
}

/// Everything extracted from a single source file. Created once per file,
/// immutable afterwards; the per-file key is the normalized relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileFacts {
    pub path: String,
    pub language: Language,
    pub functions: Vec<FunctionFacts>,
    pub types: BTreeMap<String, TypeFacts>,
    /// Raw import target strings as written, possibly unresolvable.
    pub import_paths: BTreeSet<String>,
    pub exported_names: BTreeSet<String>,
    /// Heuristic behavioral pattern counters (call shapes, async markers,
    /// error handling, I/O markers).
    pub patterns: BTreeMap<String, usize>,
    /// Identifier occurrence counts, merged project-wide for the
    /// name-frequency report.
    pub identifiers: BTreeMap<String, usize>,
    /// Names of top-level constant bindings.
    pub constants: Vec<String>,
    /// Names of top-level mutable bindings (global state candidates).
    pub mutable_globals: Vec<String>,
}

impl FileFacts {
    pub fn new(path: impl Into<String>, language: Language) -> Self {
        Self {
            path: path.into(),
            language,
            functions: Vec::new(),
            types: BTreeMap::new(),
            import_paths: BTreeSet::new(),
            exported_names: BTreeSet::new(),
            patterns: BTreeMap::new(),
            identifiers: BTreeMap::new(),
            constants: Vec::new(),
            mutable_globals: Vec::new(),
        }
    }
}

/// A file whose tree could not be produced. Recorded and skipped; never
/// aborts the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFailure {
    pub path: String,
    pub message: String,
}

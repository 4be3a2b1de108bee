use std::sync::LazyLock;

use regex::Regex;

use crate::model::{FileFacts, FunctionFacts, Language, SyntaxNode, TypeFacts};

pub mod fingerprint;
pub mod lang;
pub mod patterns;

use lang::{profile_for, LanguageProfile};

/// String-literal kinds accepted as import path arguments.
const IMPORT_STRING_KINDS: &[&str] = &[
    "string",
    "string_literal",
    "interpreted_string_literal",
    "string_fragment",
    "template_string",
];

/// Kinds carrying a dotted/scoped module path when a grammar has no
/// string-literal import form (Python, Java, Rust).
const DOTTED_PATH_KINDS: &[&str] = &[
    "dotted_name",
    "relative_import",
    "scoped_identifier",
    "scoped_use_list",
    "use_as_clause",
    "qualified_name",
];

/// Identifier kinds tallied for the project-wide name-frequency report.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "type_identifier",
    "field_identifier",
];

static CJS_BRACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]*)\}").unwrap());
static CJS_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"exports\.(\w+)").unwrap());

/// Extract per-file facts from one syntax tree.
///
/// A full pre-order walk; every node is visited exactly once. Extraction
/// never fails: missing children fall back to defaults (anonymous name,
/// zero parameters). Pure function of `(tree, source, language)`.
pub fn extract_facts(
    tree: &SyntaxNode,
    source: &str,
    path: &str,
    language: Language,
) -> FileFacts {
    let mut extractor = Extractor {
        source,
        profile: profile_for(language),
        facts: FileFacts::new(path, language),
    };
    extractor.visit(tree, 0);

    extractor.facts.constants.sort();
    extractor.facts.constants.dedup();
    extractor.facts.mutable_globals.sort();
    extractor.facts.mutable_globals.dedup();
    extractor.facts
}

struct Extractor<'a> {
    source: &'a str,
    profile: &'static LanguageProfile,
    facts: FileFacts,
}

impl Extractor<'_> {
    fn visit(&mut self, node: &SyntaxNode, depth: usize) {
        let kind = node.kind.as_str();

        if self.profile.is_function(kind) {
            self.record_function(node);
        }
        if let Some(type_kind) = self.profile.type_kind(kind) {
            self.record_type(node, type_kind);
        }
        if self.profile.is_import(kind) {
            if let Some(target) = self.import_target(node) {
                self.facts.import_paths.insert(target);
            }
        }
        if self.profile.is_export(kind) {
            self.record_export(node);
        }
        if IDENTIFIER_KINDS.contains(&kind) {
            let name = node.text(self.source);
            if !name.is_empty() && name.len() < 50 {
                *self.facts.identifiers.entry(name.to_string()).or_insert(0) += 1;
            }
        }

        // Dynamic/CommonJS forms are text shapes, not dedicated node kinds.
        self.scan_require_call(node);
        self.scan_commonjs_export(node);

        // Parent is the file's top-level scope.
        if depth == 1 && self.profile.is_binding(kind) {
            self.record_binding(node);
        }

        patterns::scan(node, self.source, &mut self.facts.patterns);

        for child in &node.children {
            self.visit(child, depth + 1);
        }
    }

    fn record_function(&mut self, node: &SyntaxNode) {
        let name = first_identifier(node, self.source)
            .unwrap_or(self.profile.anonymous_marker)
            .to_string();
        let param_count = self.count_params(node);
        self.facts.functions.push(FunctionFacts {
            signature: format!("{}({})", name, param_count),
            structural_hash: fingerprint::structural_hash(node),
            line_count: node.line_count(self.source),
            param_count,
            start_line: node.start_line,
        });
    }

    fn record_type(&mut self, node: &SyntaxNode, kind: crate::model::TypeKind) {
        let name = first_identifier(node, self.source)
            .unwrap_or(self.profile.anonymous_marker)
            .to_string();
        let start_line = node.start_line;
        self.facts
            .types
            .entry(name)
            .and_modify(|t| t.occurrences += 1)
            .or_insert(TypeFacts {
                kind,
                occurrences: 1,
                start_line,
            });
    }

    /// Parameters are counted from the first parameter-list node's named
    /// children; grammars without a list node fall back to counting
    /// parameter-kind descendants.
    fn count_params(&self, node: &SyntaxNode) -> usize {
        if let Some(list) = find_descendant(node, self.profile.parameter_list_kinds) {
            return list
                .children
                .iter()
                .filter(|c| is_named_kind(&c.kind) && !c.kind.contains("comment"))
                .count();
        }
        let mut count = 0;
        count_descendants(node, self.profile.parameter_kinds, &mut count);
        count
    }

    /// First string-literal descendant wins; dotted module paths are
    /// normalized to `/`-separated form so the resolver's suffix matching
    /// can consume them.
    fn import_target(&self, node: &SyntaxNode) -> Option<String> {
        if let Some(lit) = find_descendant(node, IMPORT_STRING_KINDS) {
            let text = strip_quotes(lit.text(self.source));
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
        for child in &node.children {
            if DOTTED_PATH_KINDS.contains(&child.kind.as_str()) {
                return Some(normalize_dotted(child.text(self.source)));
            }
        }
        // `import x` / `use x;` with a bare identifier.
        node.children
            .iter()
            .find(|c| c.kind == "identifier")
            .map(|c| c.text(self.source).to_string())
    }

    fn record_export(&mut self, node: &SyntaxNode) {
        if let Some(name) = exported_name(node, self.source) {
            self.facts.exported_names.insert(name.to_string());
        }
        for child in &node.children {
            if child.kind == "export_clause" {
                for spec in &child.children {
                    if spec.kind == "export_specifier" {
                        if let Some(name) = first_identifier(spec, self.source) {
                            self.facts.exported_names.insert(name.to_string());
                        }
                    }
                }
            }
        }
        // `export … from "./x"` is re-export indirection: the source side
        // is an import for graph purposes. Only a direct string child counts;
        // literals nested in an exported declaration are not module paths.
        for child in &node.children {
            if IMPORT_STRING_KINDS.contains(&child.kind.as_str()) {
                let text = strip_quotes(child.text(self.source));
                if !text.is_empty() {
                    self.facts.import_paths.insert(text.to_string());
                }
            }
        }
    }

    /// `require("…")` and dynamic `import("…")` call arguments.
    fn scan_require_call(&mut self, node: &SyntaxNode) {
        if node.kind != "call_expression" && node.kind != "call" {
            return;
        }
        let Some(callee) = node.children.first() else {
            return;
        };
        let callee_text = callee.text(self.source);
        if callee_text != "require" && callee_text != "import" {
            return;
        }
        for child in &node.children {
            if child.kind != "arguments" {
                continue;
            }
            for arg in &child.children {
                if !IMPORT_STRING_KINDS.contains(&arg.kind.as_str()) {
                    continue;
                }
                let text = strip_quotes(arg.text(self.source));
                // Interpolated paths are dynamic; nothing to resolve.
                if !text.is_empty() && !text.contains("${") {
                    self.facts.import_paths.insert(text.to_string());
                }
            }
        }
    }

    /// `module.exports = { a, b }` and `exports.name = …` shapes.
    fn scan_commonjs_export(&mut self, node: &SyntaxNode) {
        if node.kind != "assignment_expression" && node.kind != "expression_statement" {
            return;
        }
        let text = node.text(self.source);
        if !text.starts_with("module.exports") && !text.starts_with("exports.") {
            return;
        }
        if let Some(caps) = CJS_BRACE_RE.captures(text) {
            for part in caps[1].split(',') {
                let name = part.trim().split(':').next().unwrap_or("").trim();
                if !name.is_empty() {
                    self.facts.exported_names.insert(name.to_string());
                }
            }
        } else if let Some(caps) = CJS_NAME_RE.captures(text) {
            self.facts.exported_names.insert(caps[1].to_string());
        }
    }

    fn record_binding(&mut self, node: &SyntaxNode) {
        // Python top-level bindings are assignments inside an expression
        // statement.
        if node.kind == "expression_statement" {
            if let Some(assignment) = node.children.iter().find(|c| c.kind == "assignment") {
                self.classify_binding(assignment);
            }
            return;
        }

        let declarators: Vec<&SyntaxNode> = node
            .children
            .iter()
            .filter(|c| c.kind == "variable_declarator")
            .collect();
        if declarators.is_empty() {
            self.classify_binding(node);
        } else {
            for declarator in declarators {
                self.classify_binding(declarator);
            }
        }
    }

    fn classify_binding(&mut self, node: &SyntaxNode) {
        let Some(name) = first_identifier(node, self.source) else {
            return;
        };
        let name = name.to_string();
        let literal_init = node.children.iter().any(|c| is_literal_kind(&c.kind));
        if is_uppercase_convention(&name) || literal_init {
            self.facts.constants.push(name);
        } else {
            self.facts.mutable_globals.push(name);
        }
    }
}

/// First direct child whose kind names an identifier.
fn first_identifier<'a>(node: &SyntaxNode, source: &'a str) -> Option<&'a str> {
    node.children
        .iter()
        .find(|c| c.kind.contains("identifier"))
        .map(|c| c.text(source))
}

/// Name exposed by an export statement: first identifier-ish child, else
/// recurse into a nested declaration or declarator.
fn exported_name<'a>(node: &SyntaxNode, source: &'a str) -> Option<&'a str> {
    for child in &node.children {
        if child.kind.contains("identifier") || child.kind == "name" {
            return Some(child.text(source));
        }
        if child.kind.contains("declar") || child.kind.contains("definition") {
            if let Some(name) = exported_name(child, source) {
                return Some(name);
            }
        }
    }
    None
}

/// First descendant (pre-order) with one of the given kinds.
fn find_descendant<'a>(node: &'a SyntaxNode, kinds: &[&str]) -> Option<&'a SyntaxNode> {
    for child in &node.children {
        if kinds.contains(&child.kind.as_str()) {
            return Some(child);
        }
        if let Some(found) = find_descendant(child, kinds) {
            return Some(found);
        }
    }
    None
}

fn count_descendants(node: &SyntaxNode, kinds: &[&str], count: &mut usize) {
    for child in &node.children {
        if kinds.contains(&child.kind.as_str()) {
            *count += 1;
        }
        count_descendants(child, kinds, count);
    }
}

fn is_named_kind(kind: &str) -> bool {
    kind.len() > 1 && kind.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_literal_kind(kind: &str) -> bool {
    kind.contains("literal")
        || matches!(
            kind,
            "string"
                | "template_string"
                | "number"
                | "integer"
                | "float"
                | "true"
                | "false"
                | "null"
                | "none"
        )
}

fn is_uppercase_convention(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

/// Convert a dotted/scoped module path to the `/`-separated form the
/// resolver expects. Python relative imports keep their relative marker;
/// Rust path prefixes map to their filesystem meaning (`self` is the current
/// module's directory, `super` its parent, `crate` the source root).
fn normalize_dotted(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches(';');
    let raw = raw.split(" as ").next().unwrap_or(raw);
    let raw = raw.split('{').next().unwrap_or(raw);
    let raw = raw.trim_end_matches("::").trim_end_matches('.');

    if let Some(rest) = raw.strip_prefix('.') {
        let extra_dots = rest.chars().take_while(|c| *c == '.').count();
        let rest = &rest[extra_dots..];
        let prefix = if extra_dots == 0 {
            "./".to_string()
        } else {
            "../".repeat(extra_dots)
        };
        let tail = rest.replace('.', "/");
        if tail.is_empty() {
            prefix.trim_end_matches('/').to_string()
        } else {
            format!("{}{}", prefix, tail)
        }
    } else {
        let path = raw.replace("::", "/").replace('.', "/");
        if let Some(rest) = path.strip_prefix("crate/") {
            rest.to_string()
        } else if let Some(rest) = path.strip_prefix("self/") {
            format!("./{}", rest)
        } else if let Some(rest) = path.strip_prefix("super/") {
            format!("../{}", rest)
        } else {
            path
        }
    }
}

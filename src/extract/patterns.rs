use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::SyntaxNode;

/// String-literal kinds considered for URL/path tagging. `string_fragment`
/// is excluded so a literal and its inner fragment are not counted twice.
const STRING_KINDS: &[&str] = &[
    "string",
    "string_literal",
    "interpreted_string_literal",
    "template_string",
    "raw_string_literal",
];

const CALL_KINDS: &[&str] = &[
    "call_expression",
    "call",
    "function_call",
    "method_invocation",
];

const ERROR_KINDS: &[&str] = &[
    "try_statement",
    "try_expression",
    "catch_clause",
    "except_clause",
    "finally_clause",
];

const THROW_KINDS: &[&str] = &["throw_statement", "throw_expression", "raise_statement"];

/// Member-access kinds checked for environment-variable lookups.
const ACCESS_KINDS: &[&str] = &[
    "member_expression",
    "subscript_expression",
    "attribute",
    "subscript",
    "field_access",
    "index_expression",
];

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").unwrap());
static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(/[\w.@-]+){2,}/?$").unwrap());

/// Tag one node with any behavioral patterns it matches.
///
/// Heuristic text/kind matching, independent per call site; tags are not
/// mutually exclusive. Exact pattern detection would need full binding
/// resolution per language, which is out of scope; this is a best-effort
/// signal layer with named, enumerable categories.
pub fn scan(node: &SyntaxNode, source: &str, patterns: &mut BTreeMap<String, usize>) {
    let kind = node.kind.as_str();

    // `await_expression` is the JS/TS form; Python's named `await` node
    // carries the awaited expression as a child. The bare keyword token
    // inside `await_expression` shares the kind but has no children and
    // must not count a second time.
    if kind == "await_expression" || (kind == "await" && !node.children.is_empty()) {
        bump(patterns, "async");
    }
    if (kind.contains("function") || kind == "method_definition")
        && node.text(source).starts_with("async")
    {
        bump(patterns, "async");
    }

    if ERROR_KINDS.contains(&kind) {
        bump(patterns, "error_handling");
    }
    if THROW_KINDS.contains(&kind) {
        let name = throw_pattern(node, source);
        bump(patterns, &name);
    }

    if STRING_KINDS.contains(&kind) {
        scan_string(node, source, patterns);
    }
    if CALL_KINDS.contains(&kind) {
        scan_call(node, source, patterns);
    }

    if ACCESS_KINDS.contains(&kind) {
        let text = node.text(source);
        if text.starts_with("process.env.") || text.starts_with("os.environ[") {
            bump(patterns, "env_var");
        }
    }
}

fn scan_string(node: &SyntaxNode, source: &str, patterns: &mut BTreeMap<String, usize>) {
    let text = node
        .text(source)
        .trim_matches(|c| c == '"' || c == '\'' || c == '`');
    if URL_RE.is_match(text) {
        bump(patterns, "url_literal");
    } else if PATH_RE.is_match(text) {
        bump(patterns, "path_literal");
    }
}

fn scan_call(node: &SyntaxNode, source: &str, patterns: &mut BTreeMap<String, usize>) {
    let Some(callee) = node.children.first() else {
        return;
    };
    let name = callee.text(source);
    if name.is_empty() || name.len() >= 60 || name.contains(char::is_whitespace) {
        return;
    }

    // Per-callee call-site counter for the most common call shapes.
    if name.len() < 30 {
        bump(patterns, &format!("call:{}", name));
    }

    if name == "fetch"
        || name.starts_with("axios")
        || name.starts_with("requests.")
        || name.starts_with("reqwest")
        || name.ends_with(".fetch")
    {
        bump(patterns, "http_call");
    }

    if name.ends_with(".emit") || name.ends_with(".dispatchEvent") {
        bump(patterns, "event_emit");
    }
    if name.ends_with(".on")
        || name.ends_with(".once")
        || name.ends_with(".addEventListener")
        || name.ends_with(".addListener")
        || name.ends_with(".subscribe")
    {
        bump(patterns, "event_listen");
    }

    if name.ends_with(".query") || name.ends_with(".execute") || name.ends_with(".exec") {
        bump(patterns, "db_query");
    }

    if name.starts_with("fs.")
        || name.starts_with("std::fs::")
        || name.starts_with("Files.")
        || name.contains("readFile")
        || name.contains("writeFile")
        || name == "open"
    {
        bump(patterns, "fs_access");
    }

    if name == "JSON.parse"
        || name == "JSON.stringify"
        || name.starts_with("serde_json::")
        || name.starts_with("json.")
        || name.starts_with("pickle.")
    {
        bump(patterns, "serialization");
    }

    if name == "os.getenv"
        || name == "System.getenv"
        || name == "env::var"
        || name == "std::env::var"
    {
        bump(patterns, "env_var");
    }
}

/// `throw:<ErrorKind>` when the thrown expression names its error type,
/// plain `throw` otherwise.
fn throw_pattern(node: &SyntaxNode, source: &str) -> String {
    for child in &node.children {
        match child.kind.as_str() {
            "new_expression" | "call_expression" | "call" | "object_creation_expression" => {
                for inner in &child.children {
                    if inner.kind.contains("identifier") {
                        return format!("throw:{}", inner.text(source));
                    }
                }
            }
            k if k.contains("identifier") => {
                return format!("throw:{}", child.text(source));
            }
            _ => {}
        }
    }
    "throw".to_string()
}

fn bump(patterns: &mut BTreeMap<String, usize>, name: &str) {
    *patterns.entry(name.to_string()).or_insert(0) += 1;
}

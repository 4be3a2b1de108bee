use std::collections::BTreeSet;

/// Extensions recognized when stripping or appending candidates.
const SOURCE_EXTENSIONS: &[&str] = &[
    ".js", ".ts", ".jsx", ".tsx", ".mjs", ".cjs", ".py", ".rs", ".java",
];

/// Directory-index filenames tried when an import targets a directory.
const INDEX_FILES: &[&str] = &[
    "index.js",
    "index.ts",
    "index.jsx",
    "index.tsx",
    "mod.rs",
    "__init__.py",
];

/// Resolves raw import specifiers against the set of known project paths.
///
/// Resolution is purely lexical and deterministic: exact match, then
/// extension variants, then directory-index variants, then a fuzzy
/// trailing-segment match; the first hit wins, there is no scoring. A miss
/// is not an error; the import simply produces no graph edge.
///
/// The fuzzy fallback matches any known path whose extension-stripped
/// filename equals the specifier's last segment and whose preceding
/// segments agree pairwise from the right. It can therefore pick an
/// unrelated file that merely shares a trailing path segment. That
/// precision/recall trade-off is deliberate: tightening it changes which
/// imports resolve at all, so it stays as a documented heuristic.
#[derive(Debug)]
pub struct ImportResolver {
    known: BTreeSet<String>,
}

impl ImportResolver {
    pub fn new(known: BTreeSet<String>) -> Self {
        Self { known }
    }

    /// Resolve `import_path` as written in `from_file` to a known path.
    pub fn resolve(&self, import_path: &str, from_file: &str) -> Option<String> {
        if import_path.starts_with('.') {
            let base = dirname(from_file);
            let normalized = normalize(&format!("{}/{}", base, import_path));

            if self.known.contains(&normalized) {
                return Some(normalized);
            }

            let stem = strip_extension(&normalized);
            for ext in SOURCE_EXTENSIONS {
                let candidate = format!("{}{}", stem, ext);
                if self.known.contains(&candidate) {
                    return Some(candidate);
                }
            }

            let dir = normalized.trim_end_matches('/');
            for index in INDEX_FILES {
                let candidate = if dir.is_empty() {
                    index.to_string()
                } else {
                    format!("{}/{}", dir, index)
                };
                if self.known.contains(&candidate) {
                    return Some(candidate);
                }
            }
        }

        self.fuzzy_suffix_match(import_path)
    }

    /// Last-resort match for bare/package-style specifiers (and relative
    /// specifiers nothing else matched): compare path segments from the
    /// right, extensions stripped. Known paths are scanned in sorted order
    /// so repeated resolution of the same inputs yields the same result.
    fn fuzzy_suffix_match(&self, import_path: &str) -> Option<String> {
        let import_parts: Vec<&str> = import_path
            .split('/')
            .filter(|p| !p.is_empty() && *p != ".")
            .collect();
        let target = strip_extension(import_parts.last()?);

        'paths: for path in &self.known {
            let path_parts: Vec<&str> = path.split('/').collect();
            let file_name = strip_extension(path_parts.last()?);
            if file_name != target {
                continue;
            }

            let mut i = import_parts.len();
            let mut j = path_parts.len();
            while i > 0 && j > 0 {
                i -= 1;
                j -= 1;
                if strip_extension(import_parts[i]) != strip_extension(path_parts[j]) {
                    continue 'paths;
                }
            }
            return Some(path.clone());
        }
        None
    }
}

fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Resolve `.` and `..` segments lexically.
fn normalize(path: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out.join("/")
}

fn strip_extension(path: &str) -> &str {
    for ext in SOURCE_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(paths: &[&str]) -> ImportResolver {
        ImportResolver::new(paths.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn exact_relative_match() {
        let r = resolver(&["src/utils.js"]);
        assert_eq!(
            r.resolve("./utils.js", "src/index.js"),
            Some("src/utils.js".to_string())
        );
    }

    #[test]
    fn extension_appended() {
        let r = resolver(&["src/utils.ts"]);
        assert_eq!(
            r.resolve("./utils", "src/index.ts"),
            Some("src/utils.ts".to_string())
        );
    }

    #[test]
    fn extension_replaced() {
        // Import written with .js against a .ts source tree.
        let r = resolver(&["src/utils.ts"]);
        assert_eq!(
            r.resolve("./utils.js", "src/index.ts"),
            Some("src/utils.ts".to_string())
        );
    }

    #[test]
    fn directory_index_match() {
        let r = resolver(&["src/models/index.ts"]);
        assert_eq!(
            r.resolve("./models", "src/app.ts"),
            Some("src/models/index.ts".to_string())
        );
    }

    #[test]
    fn rust_mod_index_match() {
        let r = resolver(&["src/parser/mod.rs"]);
        assert_eq!(
            r.resolve("./parser", "src/lib.rs"),
            Some("src/parser/mod.rs".to_string())
        );
    }

    #[test]
    fn parent_directory_navigation() {
        let r = resolver(&["src/utils.js"]);
        assert_eq!(
            r.resolve("../utils", "src/components/button.js"),
            Some("src/utils.js".to_string())
        );
    }

    #[test]
    fn bare_specifier_fuzzy_suffix() {
        let r = resolver(&["packages/core/src/logger.ts"]);
        assert_eq!(
            r.resolve("core/src/logger", "packages/app/main.ts"),
            Some("packages/core/src/logger.ts".to_string())
        );
    }

    #[test]
    fn fuzzy_rejects_mismatched_parent_segment() {
        let r = resolver(&["packages/core/src/logger.ts"]);
        assert_eq!(r.resolve("other/src/logger", "main.ts"), None);
    }

    #[test]
    fn external_package_is_unresolved() {
        let r = resolver(&["src/app.js"]);
        assert_eq!(r.resolve("react", "src/app.js"), None);
    }

    #[test]
    fn fuzzy_can_match_shared_trailing_segment() {
        // Known imprecision: a single-segment specifier matches any file
        // with that stem. Kept as-is; see the type-level docs.
        let r = resolver(&["vendor/util.js"]);
        assert_eq!(
            r.resolve("util", "src/main.js"),
            Some("vendor/util.js".to_string())
        );
    }

    #[test]
    fn resolution_is_deterministic_across_calls() {
        let r = resolver(&["a/x.js", "b/x.js"]);
        let first = r.resolve("x", "main.js");
        for _ in 0..10 {
            assert_eq!(r.resolve("x", "main.js"), first);
        }
        // Sorted scan order means a/x.js wins.
        assert_eq!(first, Some("a/x.js".to_string()));
    }

    #[test]
    fn self_import_resolves_to_self() {
        let r = resolver(&["src/a.js"]);
        assert_eq!(
            r.resolve("./a", "src/a.js"),
            Some("src/a.js".to_string())
        );
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(normalize("src/components/../utils"), "src/utils");
        assert_eq!(normalize("src/./utils"), "src/utils");
        assert_eq!(normalize("./a/b"), "a/b");
    }
}

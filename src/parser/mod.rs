use thiserror::Error;
use tree_sitter::Node;

use crate::model::{Language, Span, SyntaxNode};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("grammar for {0} could not be loaded: {1}")]
    Grammar(Language, tree_sitter::LanguageError),
    #[error("tree-sitter produced no tree for {0}")]
    NoTree(String),
}

/// Parse a source file into an owned [`SyntaxNode`] tree.
///
/// The grammar is chosen by language tag; `.tsx` files get the TSX grammar
/// variant. Partial/malformed trees are returned as-is; downstream
/// extraction recovers locally and never aborts on error nodes.
pub fn parse_source(
    language: Language,
    path: &str,
    source: &str,
) -> Result<SyntaxNode, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&grammar_for(language, path))
        .map_err(|err| ParseError::Grammar(language, err))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::NoTree(path.to_string()))?;
    Ok(convert(tree.root_node()))
}

fn grammar_for(language: Language, path: &str) -> tree_sitter::Language {
    match language {
        Language::TypeScript => {
            if path.ends_with(".tsx") {
                tree_sitter_typescript::LANGUAGE_TSX.into()
            } else {
                tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
            }
        }
        Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        Language::Python => tree_sitter_python::LANGUAGE.into(),
        Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        Language::Java => tree_sitter_java::LANGUAGE.into(),
    }
}

fn convert(node: Node) -> SyntaxNode {
    let mut cursor = node.walk();
    let children = node.children(&mut cursor).map(convert).collect();
    SyntaxNode {
        kind: node.kind().to_string(),
        span: Span {
            start: node.start_byte(),
            end: node.end_byte(),
        },
        start_line: node.start_position().row + 1,
        children,
    }
}

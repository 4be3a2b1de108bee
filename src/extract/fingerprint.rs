use sha2::{Digest, Sha256};

use crate::model::SyntaxNode;

/// Compute the structural hash of a function subtree.
///
/// Pre-order walk collecting node-kind labels only (never text), with
/// identifier-kind and comment-kind subtrees excluded from recursion
/// entirely. Two functions that differ only in variable names, literals or
/// comments therefore hash identically, while a single differing
/// control-flow node changes the hash.
pub fn structural_hash(node: &SyntaxNode) -> String {
    let mut labels: Vec<&str> = Vec::new();
    collect_kinds(node, &mut labels);

    let digest = Sha256::digest(labels.join(":").as_bytes());
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

fn collect_kinds<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a str>) {
    out.push(node.kind.as_str());
    for child in &node.children {
        if child.kind.contains("identifier") || child.kind.contains("comment") {
            continue;
        }
        collect_kinds(child, out);
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::FileFacts;

/// How many member examples are listed per group.
const MAX_MEMBERS: usize = 5;

/// One function occurrence inside a duplicate group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateMember {
    pub file: String,
    pub signature: String,
}

/// A set of structurally identical functions found across the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub hash: String,
    /// Total occurrences, which may exceed `members.len()`.
    pub count: usize,
    pub members: Vec<DuplicateMember>,
}

/// Group all extracted functions by structural hash and report the largest
/// groups, biggest first, at most `max_groups` of them. Groups of one are
/// not duplicates and are dropped. Ties order by hash so output is stable.
pub fn find_duplicates(
    facts: &BTreeMap<String, FileFacts>,
    max_groups: usize,
) -> Vec<DuplicateGroup> {
    let mut by_hash: BTreeMap<&str, Vec<DuplicateMember>> = BTreeMap::new();
    for (path, file) in facts {
        for function in &file.functions {
            by_hash
                .entry(function.structural_hash.as_str())
                .or_default()
                .push(DuplicateMember {
                    file: path.clone(),
                    signature: function.signature.clone(),
                });
        }
    }

    let mut groups: Vec<DuplicateGroup> = by_hash
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(hash, mut members)| {
            let count = members.len();
            members.truncate(MAX_MEMBERS);
            DuplicateGroup {
                hash: hash.to_string(),
                count,
                members,
            }
        })
        .collect();

    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.hash.cmp(&b.hash)));
    groups.truncate(max_groups);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FunctionFacts, Language};

    fn function(signature: &str, hash: &str) -> FunctionFacts {
        FunctionFacts {
            signature: signature.to_string(),
            structural_hash: hash.to_string(),
            line_count: 3,
            param_count: 2,
            start_line: 1,
        }
    }

    fn file(path: &str, functions: Vec<FunctionFacts>) -> (String, FileFacts) {
        let mut f = FileFacts::new(path, Language::JavaScript);
        f.functions = functions;
        (path.to_string(), f)
    }

    #[test]
    fn identical_structure_groups_across_files() {
        let facts: BTreeMap<String, FileFacts> = [
            file("a.js", vec![function("add(2)", "deadbeef00000001")]),
            file("b.js", vec![function("sum(2)", "deadbeef00000001")]),
        ]
        .into_iter()
        .collect();
        let groups = find_duplicates(&facts, 10);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].members[0].file, "a.js");
        assert_eq!(groups[0].members[1].signature, "sum(2)");
    }

    #[test]
    fn singletons_are_not_reported() {
        let facts: BTreeMap<String, FileFacts> = [
            file("a.js", vec![function("f(0)", "aaaa"), function("g(0)", "bbbb")]),
        ]
        .into_iter()
        .collect();
        assert!(find_duplicates(&facts, 10).is_empty());
    }

    #[test]
    fn groups_sorted_by_count_then_hash() {
        let facts: BTreeMap<String, FileFacts> = [
            file(
                "a.js",
                vec![
                    function("f(0)", "hash_b"),
                    function("g(0)", "hash_b"),
                    function("h(0)", "hash_b"),
                    function("i(0)", "hash_a"),
                    function("j(0)", "hash_a"),
                    function("k(0)", "hash_c"),
                    function("l(0)", "hash_c"),
                ],
            ),
        ]
        .into_iter()
        .collect();
        let groups = find_duplicates(&facts, 10);
        assert_eq!(groups[0].hash, "hash_b");
        assert_eq!(groups[1].hash, "hash_a");
        assert_eq!(groups[2].hash, "hash_c");
    }

    #[test]
    fn member_list_is_capped_but_count_is_not() {
        let functions: Vec<FunctionFacts> =
            (0..8).map(|i| function(&format!("f{}(0)", i), "same")).collect();
        let facts: BTreeMap<String, FileFacts> =
            [file("a.js", functions)].into_iter().collect();
        let groups = find_duplicates(&facts, 10);
        assert_eq!(groups[0].count, 8);
        assert_eq!(groups[0].members.len(), 5);
    }

    #[test]
    fn group_list_is_capped_at_ten() {
        let mut functions = Vec::new();
        for g in 0..12 {
            functions.push(function("f(0)", &format!("hash{:02}", g)));
            functions.push(function("g(0)", &format!("hash{:02}", g)));
        }
        let facts: BTreeMap<String, FileFacts> =
            [file("a.js", functions)].into_iter().collect();
        assert_eq!(find_duplicates(&facts, 10).len(), 10);
    }
}

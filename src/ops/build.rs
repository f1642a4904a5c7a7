use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::node::TaskNode;
use crate::model::record::{MAX_LEVEL, TaskRecord};

/// A record the builder dropped or corrected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuildIssue {
    /// `parent_id` does not resolve to any record in the batch
    Orphan { id: String, parent_id: String },
    /// A later record reused an id; the first occurrence was kept
    DuplicateId { id: String },
    /// The parent exists but the chain never reaches a root (cycle, or below an orphan)
    Detached { id: String },
    /// The record would sit below the deepest level; it and its subtree were dropped
    TooDeep { id: String },
    /// Stored `level` disagrees with the parent chain; the derived depth was used
    LevelMismatch { id: String, stored: i64, derived: u8 },
}

impl BuildIssue {
    pub fn id(&self) -> &str {
        match self {
            BuildIssue::Orphan { id, .. }
            | BuildIssue::DuplicateId { id }
            | BuildIssue::Detached { id }
            | BuildIssue::TooDeep { id }
            | BuildIssue::LevelMismatch { id, .. } => id,
        }
    }

    /// Whether the record is missing from the built tree
    pub fn is_dropped(&self) -> bool {
        !matches!(self, BuildIssue::LevelMismatch { .. })
    }
}

impl std::fmt::Display for BuildIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildIssue::Orphan { id, parent_id } => {
                write!(f, "orphan: {} (parent {} not found)", id, parent_id)
            }
            BuildIssue::DuplicateId { id } => write!(f, "duplicate id: {}", id),
            BuildIssue::Detached { id } => write!(f, "detached: {} (no path to a root)", id),
            BuildIssue::TooDeep { id } => {
                write!(f, "too deep: {} (below level {})", id, MAX_LEVEL)
            }
            BuildIssue::LevelMismatch { id, stored, derived } => write!(
                f,
                "level mismatch: {} (stored {}, derived {})",
                id, stored, derived
            ),
        }
    }
}

/// Roots of the built tree plus everything the builder had to drop or correct
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub roots: Vec<TaskNode>,
    pub issues: Vec<BuildIssue>,
}

impl BuildReport {
    pub fn dropped(&self) -> impl Iterator<Item = &BuildIssue> {
        self.issues.iter().filter(|i| i.is_dropped())
    }
}

/// Build the task tree from a flat batch of records.
///
/// Returns only the roots, each with its descendants attached and every
/// sibling list sorted by `sort_order`. Records that cannot be placed are
/// dropped; use [`build_tree_with_report`] to see which.
pub fn build_tree(records: &[TaskRecord]) -> Vec<TaskNode> {
    build_tree_with_report(records).roots
}

/// Like [`build_tree`], also reporting dropped and corrected records.
pub fn build_tree_with_report(records: &[TaskRecord]) -> BuildReport {
    let mut issues = Vec::new();

    // 1. Index by id, first occurrence wins
    let mut index: IndexMap<&str, &TaskRecord> = IndexMap::with_capacity(records.len());
    for record in records {
        if index.contains_key(record.id.as_str()) {
            tracing::debug!(id = %record.id, "dropping record with duplicate id");
            issues.push(BuildIssue::DuplicateId {
                id: record.id.clone(),
            });
            continue;
        }
        index.insert(record.id.as_str(), record);
    }

    // 2. Attach each record to its parent's accumulator, or mark it a root
    let mut roots: Vec<&TaskRecord> = Vec::new();
    let mut children: HashMap<&str, Vec<&TaskRecord>> = HashMap::new();
    let mut orphans: HashSet<&str> = HashSet::new();
    for record in index.values().copied() {
        match record.parent_id.as_deref() {
            None => roots.push(record),
            Some(parent) if index.contains_key(parent) => {
                children.entry(parent).or_default().push(record);
            }
            Some(parent) => {
                tracing::debug!(id = %record.id, parent, "dropping orphaned record");
                orphans.insert(record.id.as_str());
                issues.push(BuildIssue::Orphan {
                    id: record.id.clone(),
                    parent_id: parent.to_string(),
                });
            }
        }
    }

    // 3. Finalize downward from the roots only, so cycles are never entered
    let mut placed: HashSet<&str> = HashSet::with_capacity(index.len());
    let mut too_deep: HashSet<&str> = HashSet::new();
    sort_by_order(&mut roots);
    let built: Vec<TaskNode> = roots
        .into_iter()
        .map(|root| {
            let mut finalizer = Finalizer {
                children: &children,
                placed: &mut placed,
                too_deep: &mut too_deep,
                issues: &mut issues,
            };
            finalizer.finalize(root, 0)
        })
        .collect();

    // 4. Anything indexed but never reached hangs off a cycle or an orphan
    for record in index.values().copied() {
        let id = record.id.as_str();
        if !placed.contains(id) && !orphans.contains(id) && !too_deep.contains(id) {
            tracing::debug!(id, "dropping record with no path to a root");
            issues.push(BuildIssue::Detached {
                id: record.id.clone(),
            });
        }
    }

    tracing::debug!(
        records = records.len(),
        roots = built.len(),
        placed = placed.len(),
        issues = issues.len(),
        "built task tree"
    );

    BuildReport {
        roots: built,
        issues,
    }
}

fn sort_by_order(records: &mut [&TaskRecord]) {
    // Stable: equal sort keys keep their input order
    records.sort_by_key(|r| r.sort_order);
}

struct Finalizer<'r, 'a> {
    children: &'r HashMap<&'a str, Vec<&'a TaskRecord>>,
    placed: &'r mut HashSet<&'a str>,
    too_deep: &'r mut HashSet<&'a str>,
    issues: &'r mut Vec<BuildIssue>,
}

impl<'a> Finalizer<'_, 'a> {
    fn finalize(&mut self, record: &'a TaskRecord, depth: u8) -> TaskNode {
        self.placed.insert(record.id.as_str());

        let mut owned = record.clone();
        if owned.level != i64::from(depth) {
            tracing::debug!(
                id = %owned.id,
                stored = owned.level,
                derived = depth,
                "stored level disagrees with parent chain"
            );
            self.issues.push(BuildIssue::LevelMismatch {
                id: owned.id.clone(),
                stored: owned.level,
                derived: depth,
            });
            owned.level = i64::from(depth);
        }

        let mut kids = self
            .children
            .get(record.id.as_str())
            .cloned()
            .unwrap_or_default();
        sort_by_order(&mut kids);

        let children = if depth >= MAX_LEVEL {
            for kid in kids {
                self.drop_too_deep(kid);
            }
            Vec::new()
        } else {
            kids.into_iter()
                .map(|kid| self.finalize(kid, depth + 1))
                .collect()
        };

        TaskNode {
            record: owned,
            children,
        }
    }

    /// Drop a record that would sit below `MAX_LEVEL`, along with its subtree.
    /// Iterative, so the length of the chain never grows the call stack.
    fn drop_too_deep(&mut self, record: &'a TaskRecord) {
        let mut stack = vec![record];
        while let Some(record) = stack.pop() {
            if !self.too_deep.insert(record.id.as_str()) {
                continue;
            }
            tracing::debug!(id = %record.id, "dropping record below the deepest level");
            self.issues.push(BuildIssue::TooDeep {
                id: record.id.clone(),
            });
            if let Some(kids) = self.children.get(record.id.as_str()) {
                // reversed so the report lists a subtree in preorder
                stack.extend(kids.iter().rev().copied());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use crate::ops::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn ids(nodes: &[TaskNode]) -> Vec<&str> {
        nodes.iter().map(TaskNode::id).collect()
    }

    #[test]
    fn builds_three_levels_in_sort_order() {
        let tree = build_tree(&onboarding_records());
        assert_eq!(ids(&tree), vec!["ON", "PR", "RV"]);
        assert_eq!(ids(&tree[0].children), vec!["ON.1", "ON.2"]);
        assert_eq!(ids(&tree[0].children[0].children), vec!["ON.1.1", "ON.1.2"]);
        assert_eq!(ids(&tree[1].children), vec!["PR.1"]);
        assert!(!tree[2].has_children());
    }

    #[test]
    fn orphan_is_dropped_not_promoted() {
        let records = vec![rec("A", None, 0), rec("B", Some("A"), 1), rec("C", Some("X"), 1)];
        let report = build_tree_with_report(&records);
        assert_eq!(ids(&report.roots), vec!["A"]);
        assert_eq!(ids(&report.roots[0].children), vec!["B"]);
        assert_eq!(
            report.issues,
            vec![BuildIssue::Orphan {
                id: "C".into(),
                parent_id: "X".into()
            }]
        );
    }

    #[test]
    fn children_of_orphans_are_detached() {
        let records = vec![rec("C", Some("X"), 1), rec("C.1", Some("C"), 2)];
        let report = build_tree_with_report(&records);
        assert!(report.roots.is_empty());
        assert_eq!(report.issues.len(), 2);
        assert_eq!(report.issues[1], BuildIssue::Detached { id: "C.1".into() });
    }

    #[test]
    fn cycles_are_never_entered() {
        let records = vec![
            rec("A", None, 0),
            rec("P", Some("Q"), 1),
            rec("Q", Some("P"), 1),
            rec("S", Some("S"), 1),
        ];
        let report = build_tree_with_report(&records);
        assert_eq!(ids(&report.roots), vec!["A"]);
        let detached: Vec<&str> = report.dropped().map(BuildIssue::id).collect();
        assert_eq!(detached, vec!["P", "Q", "S"]);
    }

    #[test]
    fn empty_child_lists_are_normalized() {
        let tree = build_tree(&[rec("A", None, 0)]);
        assert!(tree[0].children.is_empty());
        assert!(!tree[0].has_children());
    }

    #[test]
    fn equal_sort_orders_keep_input_order() {
        let records = vec![
            rec("A", None, 0),
            rec("z", Some("A"), 1),
            rec("m", Some("A"), 1),
            with_order(rec("a", Some("A"), 1), -1),
        ];
        let tree = build_tree(&records);
        assert_eq!(ids(&tree[0].children), vec!["a", "z", "m"]);
    }

    #[test]
    fn derived_depth_wins_over_stored_level() {
        // C claims level 2 but its parent is a root
        let records = vec![rec("A", None, 0), rec("C", Some("A"), 2)];
        let report = build_tree_with_report(&records);
        assert_eq!(report.roots[0].children[0].level(), 1);
        assert_eq!(
            report.issues,
            vec![BuildIssue::LevelMismatch {
                id: "C".into(),
                stored: 2,
                derived: 1
            }]
        );
        assert_eq!(report.dropped().count(), 0);
    }

    #[test]
    fn nonsense_stored_levels_are_corrected_not_rejected() {
        let records = vec![rec("A", None, -1), rec("B", Some("A"), 999)];
        let report = build_tree_with_report(&records);
        assert_eq!(report.roots[0].level(), 0);
        assert_eq!(report.roots[0].record.level, 0);
        assert_eq!(report.roots[0].children[0].level(), 1);
        assert_eq!(
            report.issues,
            vec![
                BuildIssue::LevelMismatch {
                    id: "A".into(),
                    stored: -1,
                    derived: 0
                },
                BuildIssue::LevelMismatch {
                    id: "B".into(),
                    stored: 999,
                    derived: 1
                },
            ]
        );
    }

    #[test]
    fn records_below_level_two_are_dropped_with_subtree() {
        let records = vec![
            rec("A", None, 0),
            rec("B", Some("A"), 1),
            rec("C", Some("B"), 2),
            rec("D", Some("C"), 3),
            rec("E", Some("D"), 4),
        ];
        let report = build_tree_with_report(&records);
        let c = &report.roots[0].children[0].children[0];
        assert_eq!(c.id(), "C");
        assert!(!c.has_children());
        let dropped: Vec<&str> = report.dropped().map(BuildIssue::id).collect();
        assert_eq!(dropped, vec!["D", "E"]);
    }

    #[test]
    fn long_chain_below_level_two_is_dropped_without_overflow() {
        let mut records = vec![rec("n0", None, 0)];
        for i in 1..=5000 {
            let parent = format!("n{}", i - 1);
            records.push(rec(&format!("n{}", i), Some(parent.as_str()), i.min(2)));
        }
        let report = build_tree_with_report(&records);
        let n2 = &report.roots[0].children[0].children[0];
        assert_eq!(n2.id(), "n2");
        assert!(!n2.has_children());
        assert_eq!(report.issues.len(), 4998);
        assert!(
            report
                .issues
                .iter()
                .all(|i| matches!(i, BuildIssue::TooDeep { .. }))
        );
        assert_eq!(report.issues[0].id(), "n3");
        assert_eq!(report.issues[4997].id(), "n5000");
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let records = vec![
            with_status(rec("A", None, 0), TaskStatus::Blocked),
            with_status(rec("A", None, 0), TaskStatus::Completed),
        ];
        let report = build_tree_with_report(&records);
        assert_eq!(report.roots.len(), 1);
        assert_eq!(report.roots[0].record.status, TaskStatus::Blocked);
        assert_eq!(report.issues, vec![BuildIssue::DuplicateId { id: "A".into() }]);
    }

    #[test]
    fn input_is_not_mutated_and_build_is_idempotent() {
        let records = onboarding_records();
        let before = records.clone();
        let first = build_tree(&records);
        let second = build_tree(&records);
        assert_eq!(records, before);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let report = build_tree_with_report(&[]);
        assert!(report.roots.is_empty());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn issue_display_is_readable() {
        let issue = BuildIssue::Orphan {
            id: "C".into(),
            parent_id: "X".into(),
        };
        assert_eq!(issue.to_string(), "orphan: C (parent X not found)");
    }
}

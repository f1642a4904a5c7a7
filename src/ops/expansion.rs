use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::node::TaskNode;

/// Expanded unless told otherwise: only top-level tasks start open
pub fn default_expanded(level: u8) -> bool {
    level == 0
}

/// Per-node expand/collapse choices, keyed by task id.
///
/// Only explicit entries are stored; any other id resolves through
/// [`default_expanded`]. Keys are ids rather than tree positions, so the
/// state survives rebuilding the tree. Entries for ids that are no longer
/// in the tree are inert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    entries: BTreeMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored entry for `id`, if any
    pub fn entry(&self, id: &str) -> Option<bool> {
        self.entries.get(id).copied()
    }

    pub fn is_expanded(&self, id: &str, level: u8) -> bool {
        self.entry(id).unwrap_or_else(|| default_expanded(level))
    }

    /// Flip the effective value of `id` and store the result explicitly
    #[must_use]
    pub fn toggle(mut self, id: &str, level: u8) -> Self {
        let next = !self.is_expanded(id, level);
        self.entries.insert(id.to_string(), next);
        self
    }

    #[must_use]
    pub fn set(mut self, id: &str, expanded: bool) -> Self {
        self.entries.insert(id.to_string(), expanded);
        self
    }

    /// Write an explicit default entry for every root that has none yet
    #[must_use]
    pub fn ensure_defaults(mut self, roots: &[TaskNode]) -> Self {
        for root in roots {
            self.entries
                .entry(root.id().to_string())
                .or_insert_with(|| default_expanded(root.level()));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One displayed row of a tree, in display order
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    pub node: &'a TaskNode,
    pub depth: usize,
    pub has_children: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
    /// For each ancestor, whether it was the last of its siblings (tree guide lines)
    pub ancestor_last: Vec<bool>,
}

/// Flatten a tree into the rows a renderer shows. Children appear only
/// under nodes that have children and are expanded.
pub fn visible_rows<'a>(roots: &'a [TaskNode], state: &ExpansionState) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    flatten(roots, 0, state, &[], &mut rows);
    rows
}

/// Like [`visible_rows`], with every node expanded
pub fn all_rows(roots: &[TaskNode]) -> Vec<VisibleRow<'_>> {
    let mut state = ExpansionState::new();
    let mut stack: Vec<&TaskNode> = roots.iter().collect();
    while let Some(node) = stack.pop() {
        if node.has_children() {
            state = state.set(node.id(), true);
            stack.extend(node.children.iter());
        }
    }
    visible_rows(roots, &state)
}

fn flatten<'a>(
    nodes: &'a [TaskNode],
    depth: usize,
    state: &ExpansionState,
    ancestor_last: &[bool],
    rows: &mut Vec<VisibleRow<'a>>,
) {
    let count = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        let is_last = i + 1 == count;
        let has_children = node.has_children();
        let is_expanded = has_children && state.is_expanded(node.id(), node.level());

        rows.push(VisibleRow {
            node,
            depth,
            has_children,
            is_expanded,
            is_last_sibling: is_last,
            ancestor_last: ancestor_last.to_vec(),
        });

        if is_expanded {
            let mut next_last = ancestor_last.to_vec();
            next_last.push(is_last);
            flatten(&node.children, depth + 1, state, &next_last, rows);
        }
    }
}

use serde::{Deserialize, Serialize};

use super::record::{MAX_LEVEL, TaskRecord};

/// A task together with its ordered subtasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    #[serde(flatten)]
    pub record: TaskRecord,
    /// Subtasks, ordered by `sort_order`. Empty for a leaf; never serialized when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaskNode>,
}

/// Output of the predicate filter. Always an owned copy of the source nodes.
pub type FilteredTaskNode = TaskNode;

impl TaskNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Depth in the tree. Built nodes always carry the derived depth.
    pub fn level(&self) -> u8 {
        u8::try_from(self.record.level.clamp(0, i64::from(MAX_LEVEL))).unwrap_or(MAX_LEVEL)
    }

    /// The "has subtasks" signal used by renderers
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TaskNode::subtree_len).sum::<usize>()
    }
}

/// Find a node anywhere in the tree by id
pub fn find_node<'a>(nodes: &'a [TaskNode], id: &str) -> Option<&'a TaskNode> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Chain of ancestors for `id`, root first. `None` if the id is not in the tree.
pub fn ancestors<'a>(nodes: &'a [TaskNode], id: &str) -> Option<Vec<&'a TaskNode>> {
    for node in nodes {
        if node.id() == id {
            return Some(Vec::new());
        }
        if let Some(mut chain) = ancestors(&node.children, id) {
            chain.insert(0, node);
            return Some(chain);
        }
    }
    None
}

/// Visit every node depth-first, parents before children
pub fn walk<'a, F>(nodes: &'a [TaskNode], f: &mut F)
where
    F: FnMut(&'a TaskNode),
{
    for node in nodes {
        f(node);
        walk(&node.children, f);
    }
}

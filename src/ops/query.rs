use regex::Regex;

use crate::model::calendar::Calendar;
use crate::model::node::{FilteredTaskNode, TaskNode};
use crate::model::record::{TaskPriority, TaskRecord, TaskStatus};
use crate::ops::filter::{FilterTab, filter_tree};

/// A combined per-record predicate: a filter tab plus optional status,
/// priority, assignee and name constraints. Every constraint must hold.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub tab: FilterTab,
    /// Any of these statuses (empty = any status)
    pub statuses: Vec<TaskStatus>,
    /// Any of these priorities (empty = any priority)
    pub priorities: Vec<TaskPriority>,
    pub resource: Option<String>,
    /// Matched against the name and description
    pub pattern: Option<Regex>,
}

impl TaskQuery {
    pub fn with_tab(tab: FilterTab) -> Self {
        TaskQuery {
            tab,
            ..Default::default()
        }
    }

    /// True when the query keeps every node
    pub fn is_unfiltered(&self) -> bool {
        self.tab == FilterTab::All
            && self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.resource.is_none()
            && self.pattern.is_none()
    }

    pub fn matches(&self, record: &TaskRecord, calendar: &Calendar) -> bool {
        if !self.tab.matches(record, calendar) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&record.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&record.priority) {
            return false;
        }
        if let Some(ref who) = self.resource
            && record.resource.as_deref() != Some(who.as_str())
        {
            return false;
        }
        if let Some(ref re) = self.pattern {
            let in_desc = record.description.as_deref().is_some_and(|d| re.is_match(d));
            if !re.is_match(&record.name) && !in_desc {
                return false;
            }
        }
        true
    }

    /// Run the query through the ancestor-preserving filter
    pub fn apply(&self, nodes: &[TaskNode], calendar: &Calendar) -> Vec<FilteredTaskNode> {
        if self.is_unfiltered() {
            return nodes.to_vec();
        }
        filter_tree(nodes, |r| self.matches(r, calendar))
    }
}

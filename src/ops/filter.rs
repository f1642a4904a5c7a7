use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::model::calendar::Calendar;
use crate::model::node::{FilteredTaskNode, TaskNode};
use crate::model::record::TaskRecord;

/// Filter the tree, keeping every node that matches `predicate` and every
/// ancestor of a match.
///
/// A kept node's children are only its kept children, in their original
/// order. The result is an independent copy; `nodes` is never touched.
pub fn filter_tree<P>(nodes: &[TaskNode], predicate: P) -> Vec<FilteredTaskNode>
where
    P: Fn(&TaskRecord) -> bool,
{
    filter_nodes(nodes, &predicate)
}

fn filter_nodes<P>(nodes: &[TaskNode], predicate: &P) -> Vec<FilteredTaskNode>
where
    P: Fn(&TaskRecord) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| filter_node(node, predicate))
        .collect()
}

fn filter_node<P>(node: &TaskNode, predicate: &P) -> Option<FilteredTaskNode>
where
    P: Fn(&TaskRecord) -> bool,
{
    let children = filter_nodes(&node.children, predicate);
    if predicate(&node.record) || !children.is_empty() {
        Some(FilteredTaskNode {
            record: node.record.clone(),
            children,
        })
    } else {
        None
    }
}

/// The standing filter tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FilterTab {
    #[default]
    All,
    Today,
    ThisWeek,
    Overdue,
    Completed,
}

impl FilterTab {
    pub const ALL: [FilterTab; 5] = [
        FilterTab::All,
        FilterTab::Today,
        FilterTab::ThisWeek,
        FilterTab::Overdue,
        FilterTab::Completed,
    ];

    /// Whether `record` matches this tab on its own (ignoring descendants).
    ///
    /// The temporal tabs read `updated_at` as the due date.
    pub fn matches(self, record: &TaskRecord, calendar: &Calendar) -> bool {
        match self {
            FilterTab::All => true,
            FilterTab::Today => calendar.is_today(&record.updated_at),
            FilterTab::ThisWeek => calendar.is_this_week(&record.updated_at),
            FilterTab::Overdue => {
                calendar.is_before_today(&record.updated_at) && !record.is_completed()
            }
            FilterTab::Completed => record.is_completed(),
        }
    }
}

pub fn filter_by_tab(
    nodes: &[TaskNode],
    tab: FilterTab,
    calendar: &Calendar,
) -> Vec<FilteredTaskNode> {
    if tab == FilterTab::All {
        return nodes.to_vec();
    }
    filter_tree(nodes, |r| tab.matches(r, calendar))
}

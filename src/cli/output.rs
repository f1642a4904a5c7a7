use serde::Serialize;

use crate::model::config::DisplayConfig;
use crate::model::node::TaskNode;
use crate::model::record::{TaskRecord, TaskStatus};
use crate::ops::aggregate::{StatusCounts, TaskCounts};
use crate::ops::build::BuildIssue;
use crate::ops::expansion::VisibleRow;
use crate::ops::filter::FilterTab;
use crate::util::unicode::{single_line, truncate_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TreeJson<'a> {
    pub tab: FilterTab,
    pub tasks: &'a [TaskNode],
}

#[derive(Serialize)]
pub struct StatsJson {
    pub tab: FilterTab,
    #[serde(flatten)]
    pub counts: TaskCounts,
    pub statuses: StatusCounts,
}

#[derive(Serialize)]
pub struct ShowJson<'a> {
    /// Root first
    pub ancestors: Vec<&'a TaskRecord>,
    pub task: &'a TaskNode,
}

#[derive(Serialize)]
pub struct CheckJson<'a> {
    pub valid: bool,
    pub placed: usize,
    pub issues: &'a [BuildIssue],
}

#[derive(Serialize)]
pub struct ExpansionJson<'a> {
    pub id: &'a str,
    pub expanded: bool,
}

#[derive(Serialize)]
pub struct ResetJson {
    pub removed: bool,
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn marker(row: &VisibleRow) -> char {
    match (row.has_children, row.is_expanded) {
        (true, true) => '▾',
        (true, false) => '▸',
        (false, _) => '·',
    }
}

/// Tree guide prefix for a row: one column per non-root ancestor, then
/// the connector to the row itself
fn guides(row: &VisibleRow) -> String {
    if row.depth == 0 {
        return String::new();
    }
    let mut out = String::new();
    for &last in row.ancestor_last.iter().skip(1) {
        out.push_str(if last { "   " } else { "│  " });
    }
    out.push_str(if row.is_last_sibling { "└─ " } else { "├─ " });
    out
}

/// Format a record as a one-line summary (no tree guides)
pub fn format_task_line(record: &TaskRecord, display: &DisplayConfig) -> String {
    let mut line = String::new();
    if display.show_ids {
        line.push_str(&record.id);
        line.push(' ');
    }
    line.push_str(&truncate_to_width(
        &single_line(&record.name),
        display.name_width,
    ));
    line.push_str(&format!(" [{}]", record.status));
    if display.show_resource
        && let Some(ref who) = record.resource
    {
        line.push_str(&format!(" @{}", who));
    }
    line
}

/// Format one visible row, with guides and the expand marker
pub fn format_row(row: &VisibleRow, display: &DisplayConfig) -> String {
    format!(
        "{}{} {}",
        guides(row),
        marker(row),
        format_task_line(&row.node.record, display)
    )
}

pub fn format_rows(rows: &[VisibleRow], display: &DisplayConfig) -> Vec<String> {
    rows.iter().map(|row| format_row(row, display)).collect()
}

fn stat_line(label: &str, n: usize) -> String {
    format!("{:<12} {}", label, n)
}

/// Summary counters followed by the per-status breakdown
pub fn format_stats(counts: &TaskCounts, statuses: &StatusCounts) -> Vec<String> {
    let mut lines = vec![
        stat_line("total", counts.total),
        stat_line("completed", counts.completed),
        stat_line("in progress", counts.in_progress),
        stat_line("due today", counts.due_today),
        String::new(),
    ];
    for status in TaskStatus::ALL {
        lines.push(stat_line(status.as_str(), statuses.get(status)));
    }
    lines
}

/// Detailed view of one task
pub fn format_task_detail(node: &TaskNode, display: &DisplayConfig) -> Vec<String> {
    let record = &node.record;
    let mut lines = vec![format!("{} {}", record.id, single_line(&record.name))];
    lines.push(format!("status: {}", record.status));
    lines.push(format!("priority: {}", record.priority));
    lines.push(format!("level: {}", record.level));
    if let Some(ref parent) = record.parent_id {
        lines.push(format!("parent: {}", parent));
    }
    if let Some(ref who) = record.resource {
        lines.push(format!("resource: {}", who));
    }
    lines.push(format!("updated: {}", record.updated_at.format("%Y-%m-%d %H:%M UTC")));
    if let Some(ref desc) = record.description {
        lines.push("description:".to_string());
        for line in desc.lines() {
            lines.push(format!("  {}", line));
        }
    }

    if node.has_children() {
        lines.push(String::new());
        lines.push("subtasks:".to_string());
        lines.extend(format_subtree(&node.children, 1, display));
    }
    lines
}

/// Ancestor chain (root first, indented by depth) followed by the detail view
pub fn format_task_detail_with_context(
    ancestors: &[&TaskNode],
    node: &TaskNode,
    display: &DisplayConfig,
) -> Vec<String> {
    let mut lines: Vec<String> = ancestors
        .iter()
        .enumerate()
        .map(|(depth, a)| format!("{}{}", "  ".repeat(depth), format_task_line(&a.record, display)))
        .collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.extend(format_task_detail(node, display));
    lines
}

fn format_subtree(nodes: &[TaskNode], indent: usize, display: &DisplayConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for node in nodes {
        lines.push(format!(
            "{}{}",
            "  ".repeat(indent),
            format_task_line(&node.record, display)
        ));
        lines.extend(format_subtree(&node.children, indent + 1, display));
    }
    lines
}

pub fn format_issue(issue: &BuildIssue) -> String {
    let tag = if issue.is_dropped() { "dropped" } else { "fixed" };
    format!("  [{}] {}", tag, issue)
}

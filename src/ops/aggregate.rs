use serde::Serialize;

use crate::model::calendar::Calendar;
use crate::model::node::TaskNode;
use crate::model::record::{TaskRecord, TaskStatus};

/// Summary-card counters for a tree
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub due_today: usize,
}

/// Per-status breakdown of a tree
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub in_review: usize,
    pub completed: usize,
    pub blocked: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::NotStarted => self.not_started,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::InReview => self.in_review,
            TaskStatus::Completed => self.completed,
            TaskStatus::Blocked => self.blocked,
        }
    }
}

/// Count the nodes (at any depth) whose record satisfies `pred`
pub fn count_matching<P>(nodes: &[TaskNode], pred: &P) -> usize
where
    P: Fn(&TaskRecord) -> bool,
{
    nodes
        .iter()
        .map(|node| usize::from(pred(&node.record)) + count_matching(&node.children, pred))
        .sum()
}

pub fn count_total(nodes: &[TaskNode]) -> usize {
    count_matching(nodes, &|_: &TaskRecord| true)
}

pub fn count_completed(nodes: &[TaskNode]) -> usize {
    count_matching(nodes, &TaskRecord::is_completed)
}

pub fn count_in_progress(nodes: &[TaskNode]) -> usize {
    count_matching(nodes, &|r: &TaskRecord| r.status == TaskStatus::InProgress)
}

/// Open tasks whose `updated_at` falls on the calendar's today
pub fn count_due_today(nodes: &[TaskNode], calendar: &Calendar) -> usize {
    count_matching(nodes, &|r: &TaskRecord| {
        !r.is_completed() && calendar.is_today(&r.updated_at)
    })
}

/// All four summary counters
pub fn summarize(nodes: &[TaskNode], calendar: &Calendar) -> TaskCounts {
    TaskCounts {
        total: count_total(nodes),
        completed: count_completed(nodes),
        in_progress: count_in_progress(nodes),
        due_today: count_due_today(nodes, calendar),
    }
}

pub fn status_counts(nodes: &[TaskNode]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    tally_statuses(nodes, &mut counts);
    counts
}

fn tally_statuses(nodes: &[TaskNode], counts: &mut StatusCounts) {
    for node in nodes {
        match node.record.status {
            TaskStatus::NotStarted => counts.not_started += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::InReview => counts.in_review += 1,
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::Blocked => counts.blocked += 1,
        }
        tally_statuses(&node.children, counts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::build::build_tree;
    use crate::ops::test_helpers::*;

    #[test]
    fn counts_every_level() {
        let tree = build_tree(&onboarding_records());
        let cal = calendar();
        assert_eq!(
            summarize(&tree, &cal),
            TaskCounts {
                total: 8,
                completed: 3,
                in_progress: 2,
                // ON and PR.1 are open and updated today; RV is today but completed
                due_today: 2,
            }
        );
    }

    #[test]
    fn orphan_scenario_totals_two() {
        let records = vec![rec("A", None, 0), rec("B", Some("A"), 1), rec("C", Some("X"), 1)];
        assert_eq!(count_total(&build_tree(&records)), 2);
    }

    #[test]
    fn empty_tree_counts_zero() {
        let cal = calendar();
        assert_eq!(summarize(&[], &cal), TaskCounts::default());
        assert_eq!(status_counts(&[]), StatusCounts::default());
    }

    #[test]
    fn reducers_are_additive_over_roots() {
        let tree = build_tree(&onboarding_records());
        let cal = calendar();
        let whole = summarize(&tree, &cal);
        let mut parts = TaskCounts::default();
        for root in &tree {
            let one = summarize(std::slice::from_ref(root), &cal);
            parts.total += one.total;
            parts.completed += one.completed;
            parts.in_progress += one.in_progress;
            parts.due_today += one.due_today;
        }
        assert_eq!(whole, parts);
        assert_eq!(
            whole.total,
            tree.iter().map(|r| 1 + count_total(&r.children)).sum::<usize>()
        );
    }

    #[test]
    fn due_today_ignores_completed_and_other_days() {
        let records = vec![
            rec("A", None, 0),
            with_status(rec("B", Some("A"), 1), TaskStatus::Completed),
            updated(rec("C", Some("A"), 1), -1),
            updated(rec("D", Some("A"), 1), 1),
        ];
        assert_eq!(count_due_today(&build_tree(&records), &calendar()), 1);
    }

    #[test]
    fn status_breakdown_sums_to_total() {
        let tree = build_tree(&onboarding_records());
        let counts = status_counts(&tree);
        assert_eq!(counts.get(TaskStatus::Completed), 3);
        assert_eq!(counts.get(TaskStatus::Blocked), 1);
        let sum: usize = TaskStatus::ALL.into_iter().map(|s| counts.get(s)).sum();
        assert_eq!(sum, count_total(&tree));
    }
}

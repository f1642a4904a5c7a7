use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Deepest level a task may sit at (task → subtask → sub-subtask)
pub const MAX_LEVEL: u8 = 2;

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    InReview,
    Completed,
    Blocked,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// The wire name (`not-started`, `in-progress`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not-started",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::InReview => "in-review",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// A task as delivered by the storage layer: flat, pointing at its parent by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Opaque identifier, stable across fetches
    pub id: String,
    /// Owning record, or `None` for a top-level task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Stored depth. Advisory only: the builder checks it against the parent
    /// chain, so any integer is accepted here.
    #[serde(default)]
    pub level: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    /// Assignee reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Last modification time. Temporal filters treat it as the due date.
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sort_order: i64,
}

impl TaskRecord {
    /// Create a top-level, not-started, medium-priority record
    pub fn new(id: impl Into<String>, name: impl Into<String>, updated_at: DateTime<Utc>) -> Self {
        TaskRecord {
            id: id.into(),
            parent_id: None,
            level: 0,
            name: name.into(),
            description: None,
            status: TaskStatus::NotStarted,
            priority: TaskPriority::Medium,
            resource: None,
            updated_at,
            sort_order: 0,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

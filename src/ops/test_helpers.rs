use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::model::{Calendar, TaskRecord, TaskStatus, WeekStart};

/// Fixed "now" for tests: Monday 2026-10-19, 10:00 UTC
pub fn calendar() -> Calendar {
    let utc = FixedOffset::east_opt(0).unwrap();
    Calendar::new(utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap(), WeekStart::Sunday)
}

/// A timestamp `days` days away from the test calendar's today, at noon UTC
pub fn day(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap() + chrono::Duration::days(days)
}

/// A not-started record updated today
pub fn rec(id: &str, parent: Option<&str>, level: i64) -> TaskRecord {
    let mut r = TaskRecord::new(id, format!("Task {}", id), day(0));
    r.parent_id = parent.map(str::to_string);
    r.level = level;
    r
}

pub fn with_status(mut r: TaskRecord, status: TaskStatus) -> TaskRecord {
    r.status = status;
    r
}

pub fn with_order(mut r: TaskRecord, sort_order: i64) -> TaskRecord {
    r.sort_order = sort_order;
    r
}

pub fn updated(mut r: TaskRecord, days: i64) -> TaskRecord {
    r.updated_at = day(days);
    r
}

/// Onboarding-style fixture with all three levels:
///
/// ```text
/// ON   onboarding        in-progress  today
///   ON.1 paperwork       completed    -3d
///     ON.1.1 contract    completed    -3d
///     ON.1.2 tax forms   blocked      -1d
///   ON.2 equipment       not-started  +2d
/// PR   payroll run       not-started  -8d
///   PR.1 timesheets      in-progress  today
/// RV   review cycle      completed    today
/// ```
pub fn onboarding_records() -> Vec<TaskRecord> {
    vec![
        with_order(updated(with_status(rec("PR", None, 0), TaskStatus::NotStarted), -8), 2),
        with_order(with_status(rec("ON", None, 0), TaskStatus::InProgress), 1),
        with_order(updated(rec("ON.2", Some("ON"), 1), 2), 2),
        with_order(
            updated(with_status(rec("ON.1", Some("ON"), 1), TaskStatus::Completed), -3),
            1,
        ),
        with_order(
            updated(with_status(rec("ON.1.2", Some("ON.1"), 2), TaskStatus::Blocked), -1),
            2,
        ),
        with_order(
            updated(with_status(rec("ON.1.1", Some("ON.1"), 2), TaskStatus::Completed), -3),
            1,
        ),
        with_status(rec("PR.1", Some("PR"), 1), TaskStatus::InProgress),
        with_order(with_status(rec("RV", None, 0), TaskStatus::Completed), 3),
    ]
}

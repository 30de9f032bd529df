//! Derived display status
//!
//! Status is computed from raw fields on every render, never stored. The
//! completion flag dominates the due-date comparison unconditionally, and the
//! due-date comparison is strict: an entity is `Due` only when its relevant
//! due date is strictly before "now".

use crate::entity::{Project, Task};
use chrono::{NaiveDate, NaiveDateTime};

/// Display status of a project or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedStatus {
    /// Marked completed; overrides any due date
    Completed,
    /// Past its earliest relevant due date
    Due,
    /// Neither completed nor past due
    Pending,
}

impl std::fmt::Display for DerivedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Completed => "completed",
            Self::Due => "due",
            Self::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// Far-future sentinel used when a project has no tasks, so an empty project
/// defaults to `Pending` rather than `Due`.
#[must_use]
pub fn far_future() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2100, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MAX)
}

/// Derive the display status of a project at the given instant.
///
/// The earliest due date across the merged task set is the relevant one; a
/// project with no tasks compares against the far-future sentinel.
#[must_use]
pub fn derive_project_status(project: &Project, now: NaiveDateTime) -> DerivedStatus {
    if project.completed {
        return DerivedStatus::Completed;
    }
    let due = project
        .tasks
        .earliest_due()
        .map_or_else(far_future, |date| date.naive());
    if due < now {
        DerivedStatus::Due
    } else {
        DerivedStatus::Pending
    }
}

/// Derive the display status of a single task at the given instant.
#[must_use]
pub fn derive_task_status(task: &Task, now: NaiveDateTime) -> DerivedStatus {
    if task.is_completed() {
        return DerivedStatus::Completed;
    }
    if task.date_due.naive() < now {
        DerivedStatus::Due
    } else {
        DerivedStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateFormatter;
    use crate::entity::TaskSet;
    use crate::identity::{Identity, RemoteId};

    fn project(completed: bool, due: Option<&str>) -> Project {
        let tasks = match due {
            Some(raw) => TaskSet::from_remote(vec![Task {
                id: Identity::Remote(RemoteId(1)),
                name: "task".to_string(),
                description: String::new(),
                date_due: DateFormatter::default().format(raw).unwrap(),
                date_completed: None,
            }]),
            None => TaskSet::new(),
        };
        Project {
            id: RemoteId(1),
            name: "project".to_string(),
            tasks,
            completed,
        }
    }

    fn at(raw: &str) -> NaiveDateTime {
        DateFormatter::default().format(raw).unwrap().naive()
    }

    #[test]
    fn completed_flag_dominates_past_due_date() {
        let project = project(true, Some("2020-01-01"));
        let status = derive_project_status(&project, at("2024-06-01"));
        assert_eq!(status, DerivedStatus::Completed);
    }

    #[test]
    fn empty_project_defaults_to_pending() {
        let project = project(false, None);
        let status = derive_project_status(&project, at("2024-06-01"));
        assert_eq!(status, DerivedStatus::Pending);
    }

    #[test]
    fn past_due_project_is_due() {
        let project = project(false, Some("2020-01-01"));
        let status = derive_project_status(&project, at("2024-06-01"));
        assert_eq!(status, DerivedStatus::Due);
    }

    #[test]
    fn due_exactly_now_is_still_pending() {
        // Strict comparison: dueDate < now, not <=
        let project = project(false, Some("2024-06-01T12:00:00"));
        let status = derive_project_status(&project, at("2024-06-01T12:00:00"));
        assert_eq!(status, DerivedStatus::Pending);
    }

    #[test]
    fn task_with_completion_stamp_is_completed() {
        let formatter = DateFormatter::default();
        let task = Task {
            id: Identity::Remote(RemoteId(1)),
            name: "task".to_string(),
            description: String::new(),
            date_due: formatter.format("2020-01-01").unwrap(),
            date_completed: Some(formatter.format("2020-02-01").unwrap()),
        };
        let status = derive_task_status(&task, at("2024-06-01"));
        assert_eq!(status, DerivedStatus::Completed);
    }
}

//! Projects, tasks, and the dual-partition task set
//!
//! Tasks live in one of two disjoint partitions: the remote-confirmed set
//! (source of truth, replaced wholesale on every refetch) and the
//! local-pending set (created this session, not persisted). The merged view
//! consumed by the UI is the concatenation of the two, remote entries first.
//! Keeping the partitions as separate sequences makes the "never transition
//! Remote to Local" rule structural rather than a flag to police.

use crate::date::CanonicalDate;
use crate::identity::{Identity, LocalId, Origin, RemoteId};

/// A single task in the merged view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Identity; origin never changes after creation
    pub id: Identity,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Due date in canonical form
    pub date_due: CanonicalDate,
    /// Completion stamp, absent while open
    pub date_completed: Option<CanonicalDate>,
}

impl Task {
    /// Origin tag read from the identity
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.id.origin()
    }

    /// Whether this task is session-local
    #[inline]
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.id.is_local()
    }

    /// A task is completed when a completion stamp is present
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.date_completed.is_some()
    }
}

/// Form payload for creating a task. The due date is the raw user input,
/// validated and canonicalized before any mutation is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Raw due-date input
    pub date_due: String,
}

/// Full-replacement edit payload for a task (the edit form always submits
/// every field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    /// New display name
    pub name: String,
    /// New description
    pub description: String,
    /// Raw due-date input
    pub date_due: String,
}

/// Form payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Raw due-date input
    pub date_due: String,
}

/// Full-replacement edit payload for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPatch {
    /// New display name
    pub name: String,
    /// New description
    pub description: String,
    /// Raw due-date input
    pub date_due: String,
}

/// The dual partition of tasks for one project.
///
/// The remote partition is only ever replaced wholesale; the local partition
/// is appended to in creation order and spliced by identity. Merged reads
/// yield remote entries first, then local, preserving relative order. No
/// deduplication by content is performed on read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSet {
    remote: Vec<Task>,
    local: Vec<Task>,
}

impl TaskSet {
    /// Empty task set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Task set seeded from a remote query result
    #[inline]
    #[must_use]
    pub fn from_remote(remote: Vec<Task>) -> Self {
        Self {
            remote,
            local: Vec::new(),
        }
    }

    /// Merged view: remote entries first, then local, in original order
    pub fn merged(&self) -> impl Iterator<Item = &Task> {
        self.remote.iter().chain(self.local.iter())
    }

    /// Remote-confirmed entries
    #[inline]
    #[must_use]
    pub fn remote(&self) -> &[Task] {
        &self.remote
    }

    /// Local-pending entries
    #[inline]
    #[must_use]
    pub fn local(&self) -> &[Task] {
        &self.local
    }

    /// Number of tasks in the merged view
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.remote.len() + self.local.len()
    }

    /// Whether the merged view is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remote.is_empty() && self.local.is_empty()
    }

    /// Replace the remote partition wholesale; the local partition is
    /// untouched.
    pub fn replace_remote(&mut self, remote: Vec<Task>) {
        self.remote = remote;
    }

    /// Append a session-local task in creation order.
    ///
    /// Only local-origin tasks belong in the local partition.
    pub fn push_local(&mut self, task: Task) {
        debug_assert!(task.is_local(), "remote task pushed into local partition");
        self.local.push(task);
    }

    /// Mutable access to a local-pending task by identity
    pub fn local_mut(&mut self, id: LocalId) -> Option<&mut Task> {
        self.local
            .iter_mut()
            .find(|task| task.id == Identity::Local(id))
    }

    /// Remove a local-pending task by identity; returns whether it was present
    pub fn remove_local(&mut self, id: LocalId) -> bool {
        let before = self.local.len();
        self.local.retain(|task| task.id != Identity::Local(id));
        self.local.len() != before
    }

    /// Drop local-pending entries whose remote counterpart (same name,
    /// description, and due date) is now confirmed.
    pub fn dedupe_confirmed(&mut self) {
        let remote = &self.remote;
        self.local.retain(|pending| {
            !remote.iter().any(|confirmed| {
                confirmed.name == pending.name
                    && confirmed.description == pending.description
                    && confirmed.date_due == pending.date_due
            })
        });
    }

    /// Earliest due date across the merged view
    #[must_use]
    pub fn earliest_due(&self) -> Option<&CanonicalDate> {
        self.merged().map(|task| &task.date_due).min()
    }
}

/// A project in the merged view.
///
/// Projects are never session-local: they are created through the remote
/// path only, so the identity is always server-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Server-assigned identity
    pub id: RemoteId,
    /// Display name
    pub name: String,
    /// Tasks scoped to this project
    pub tasks: TaskSet,
    /// Completion flag from the remote status field
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateFormatter;

    fn task(id: Identity, name: &str) -> Task {
        Task {
            id,
            name: name.to_string(),
            description: format!("{name} description"),
            date_due: DateFormatter::default().format("2025-12-31").unwrap(),
            date_completed: None,
        }
    }

    #[test]
    fn merged_yields_remote_before_local_in_order() {
        let mut set = TaskSet::from_remote(vec![
            task(Identity::Remote(RemoteId(1)), "first"),
            task(Identity::Remote(RemoteId(2)), "second"),
        ]);
        set.push_local(task(Identity::Local(LocalId(100)), "draft-a"));
        set.push_local(task(Identity::Local(LocalId(101)), "draft-b"));

        let names: Vec<&str> = set.merged().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "draft-a", "draft-b"]);
        // Stable across repeated reads
        let again: Vec<&str> = set.merged().map(|t| t.name.as_str()).collect();
        assert_eq!(names, again);
    }

    #[test]
    fn replace_remote_preserves_local_partition() {
        let mut set = TaskSet::from_remote(vec![task(Identity::Remote(RemoteId(1)), "old")]);
        set.push_local(task(Identity::Local(LocalId(100)), "draft"));
        set.replace_remote(vec![task(Identity::Remote(RemoteId(2)), "new")]);

        let names: Vec<&str> = set.merged().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["new", "draft"]);
    }

    #[test]
    fn dedupe_drops_confirmed_drafts_only() {
        let mut set = TaskSet::new();
        set.push_local(task(Identity::Local(LocalId(100)), "confirmed"));
        set.push_local(task(Identity::Local(LocalId(101)), "still pending"));
        set.replace_remote(vec![task(Identity::Remote(RemoteId(7)), "confirmed")]);

        set.dedupe_confirmed();
        let names: Vec<&str> = set.merged().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["confirmed", "still pending"]);
    }

    #[test]
    fn remove_local_reports_presence() {
        let mut set = TaskSet::new();
        set.push_local(task(Identity::Local(LocalId(100)), "draft"));
        assert!(set.remove_local(LocalId(100)));
        assert!(!set.remove_local(LocalId(100)));
        assert!(set.is_empty());
    }

    #[test]
    fn earliest_due_spans_both_partitions() {
        let formatter = DateFormatter::default();
        let mut early = task(Identity::Local(LocalId(100)), "early");
        early.date_due = formatter.format("2020-01-01").unwrap();
        let mut set = TaskSet::from_remote(vec![task(Identity::Remote(RemoteId(1)), "late")]);
        set.push_local(early);

        let due = set.earliest_due().unwrap();
        assert_eq!(due.to_string(), "2020-01-01 00:00:00.000000 +0300");
    }
}

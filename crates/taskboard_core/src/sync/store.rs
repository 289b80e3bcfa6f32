//! Latest task snapshot for the current project.
//!
//! Snapshots replace, never merge: the last `task_sync` delivered for the
//! current project wins. Editor liveness is tracked alongside but changes
//! independently and survives reconnects until explicitly set or cleared.

use chrono::{DateTime, Utc};

use super::task::Task;

/// What the viewer currently believes about the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSnapshot {
    /// Tasks in delivery order.
    pub tasks: Vec<Task>,
    /// `true` when the tasks came from a replay rather than a fresh push.
    pub is_cached: bool,
    /// Whether the editor is believed to be online.
    pub editor_online: bool,
}

/// Owner of the current [`SyncSnapshot`].
#[derive(Debug, Clone, Default)]
pub struct SyncStateStore {
    snapshot: SyncSnapshot,
    last_synced_at: Option<DateTime<Utc>>,
}

impl SyncStateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the task list and cached flag wholesale.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>, cached: bool) {
        self.snapshot.tasks = tasks;
        self.snapshot.is_cached = cached;
        self.last_synced_at = Some(Utc::now());
    }

    /// Set editor liveness. Returns `true` if the value changed.
    pub fn set_editor_online(&mut self, online: bool) -> bool {
        let changed = self.snapshot.editor_online != online;
        self.snapshot.editor_online = online;
        changed
    }

    /// Reset to the empty snapshot, liveness included.
    pub fn clear(&mut self) {
        self.snapshot = SyncSnapshot::default();
        self.last_synced_at = None;
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &SyncSnapshot {
        &self.snapshot
    }

    /// Current tasks.
    pub fn tasks(&self) -> &[Task] {
        &self.snapshot.tasks
    }

    /// Whether the current tasks are a replay.
    pub fn is_cached(&self) -> bool {
        self.snapshot.is_cached
    }

    /// Whether the editor is believed online.
    pub fn editor_online(&self) -> bool {
        self.snapshot.editor_online
    }

    /// When the last snapshot was applied, if any.
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str) -> Task {
        Task {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = SyncStateStore::new();
        store.replace_tasks(vec![task("a"), task("b")], true);
        store.replace_tasks(vec![task("c")], false);

        assert_eq!(store.tasks(), &[task("c")]);
        assert!(!store.is_cached());
        assert!(store.last_synced_at().is_some());
    }

    #[test]
    fn test_replace_is_idempotent() {
        let mut store = SyncStateStore::new();
        store.replace_tasks(vec![task("a"), task("b")], false);
        let first = store.snapshot().clone();
        store.replace_tasks(vec![task("a"), task("b")], false);
        assert_eq!(store.snapshot(), &first);
    }

    #[test]
    fn test_liveness_is_independent_of_tasks() {
        let mut store = SyncStateStore::new();
        assert!(store.set_editor_online(true));
        assert!(!store.set_editor_online(true));

        store.replace_tasks(vec![task("a")], false);
        assert!(store.editor_online());

        assert!(store.set_editor_online(false));
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = SyncStateStore::new();
        store.replace_tasks(vec![task("a")], true);
        store.set_editor_online(true);
        store.clear();

        assert_eq!(store.snapshot(), &SyncSnapshot::default());
        assert!(store.last_synced_at().is_none());
    }
}

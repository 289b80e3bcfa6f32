//! Presentation projection of the synchronized board.
//!
//! A [`BoardView`] is computed from a task list and a text filter. The filter
//! only narrows what is shown; it never touches synchronized state.

use chrono::{DateTime, TimeZone};

use crate::sync::{Task, TaskPriority, TaskStatus};

/// Title shown for a task without one.
pub const UNTITLED_TASK: &str = "Untitled Sequence";

/// Description shown for a task without one.
pub const EMPTY_DESCRIPTION: &str = "No metadata available for this task.";

/// Assignee shown for an unassigned task.
pub const UNASSIGNED: &str = "Unassigned";

/// One task as displayed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    /// Position of the task in the snapshot.
    pub index: usize,
    /// Title, or [`UNTITLED_TASK`].
    pub title: String,
    /// Description, or [`EMPTY_DESCRIPTION`].
    pub description: String,
    /// Assignee, or [`UNASSIGNED`].
    pub assignee: String,
    /// Up to two uppercase initials, `??` when unassigned.
    pub initials: String,
    /// Priority label.
    pub priority: TaskPriority,
}

impl TaskCard {
    fn from_task(index: usize, task: &Task) -> Self {
        Self {
            index,
            title: non_empty_or(&task.title, UNTITLED_TASK),
            description: non_empty_or(&task.description, EMPTY_DESCRIPTION),
            assignee: non_empty_or(&task.assignee, UNASSIGNED),
            initials: initials(&task.assignee),
            priority: task.priority,
        }
    }
}

/// One status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Status this column holds.
    pub status: TaskStatus,
    /// Visible cards in delivery order.
    pub cards: Vec<TaskCard>,
}

impl Column {
    /// Number of visible cards.
    pub fn count(&self) -> usize {
        self.cards.len()
    }
}

/// The board split into status columns, after filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// Columns in [`TaskStatus::ALL`] order, always four.
    pub columns: Vec<Column>,
}

impl BoardView {
    /// Group `tasks` by status, keeping only those matching `filter`.
    ///
    /// The filter is a case-insensitive substring match on title or
    /// description. An empty or blank filter matches everything.
    pub fn project(tasks: &[Task], filter: &str) -> Self {
        let needle = filter.trim().to_lowercase();
        let mut columns: Vec<Column> = TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                cards: Vec::new(),
            })
            .collect();

        for (index, task) in tasks.iter().enumerate() {
            if !needle.is_empty() && !matches(task, &needle) {
                continue;
            }
            if let Some(column) = columns.iter_mut().find(|c| c.status == task.status) {
                column.cards.push(TaskCard::from_task(index, task));
            }
        }

        Self { columns }
    }

    /// Column for `status`.
    pub fn column(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }

    /// Visible cards across all columns.
    pub fn total(&self) -> usize {
        self.columns.iter().map(Column::count).sum()
    }
}

/// `LAST SYNC: HH:MM:SS` in the timezone of `at`.
pub fn last_sync_label<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("LAST SYNC: {}", at.format("%H:%M:%S"))
}

/// First letters of the first two words of `name`, uppercased.
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    if letters.is_empty() {
        "??".to_string()
    } else {
        letters
    }
}

fn matches(task: &Task, needle: &str) -> bool {
    task.title.to_lowercase().contains(needle) || task.description.to_lowercase().contains(needle)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn task(title: &str, status: TaskStatus) -> Task {
        Task {
            title: title.to_string(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn test_project_groups_in_column_order() {
        let tasks = vec![
            task("a", TaskStatus::Completed),
            task("b", TaskStatus::Pending),
            task("c", TaskStatus::Completed),
        ];
        let view = BoardView::project(&tasks, "");

        let statuses: Vec<_> = view.columns.iter().map(|c| c.status).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        let done = view.column(TaskStatus::Completed).unwrap();
        assert_eq!(done.count(), 2);
        assert_eq!(done.cards[0].title, "a");
        assert_eq!(done.cards[1].index, 2);
        assert_eq!(view.column(TaskStatus::Blocked).unwrap().count(), 0);
        assert_eq!(view.total(), 3);
    }

    #[test]
    fn test_filter_matches_title_or_description() {
        let mut with_desc = task("Deploy", TaskStatus::InProgress);
        with_desc.description = "Roll out the RELAY".to_string();
        let tasks = vec![with_desc, task("Write docs", TaskStatus::Pending)];

        let view = BoardView::project(&tasks, "relay");
        assert_eq!(view.total(), 1);
        assert_eq!(view.column(TaskStatus::InProgress).unwrap().count(), 1);

        let view = BoardView::project(&tasks, "DOCS");
        assert_eq!(view.column(TaskStatus::Pending).unwrap().cards[0].index, 1);

        assert_eq!(BoardView::project(&tasks, "   ").total(), 2);
        assert_eq!(BoardView::project(&tasks, "nothing").total(), 0);
    }

    #[test]
    fn test_card_fallbacks() {
        let card = TaskCard::from_task(0, &Task::default());
        assert_eq!(card.title, UNTITLED_TASK);
        assert_eq!(card.description, EMPTY_DESCRIPTION);
        assert_eq!(card.assignee, UNASSIGNED);
        assert_eq!(card.initials, "??");
        assert_eq!(card.priority, TaskPriority::Medium);
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ada lovelace"), "AL");
        assert_eq!(initials("Grace Brewster Hopper"), "GB");
        assert_eq!(initials("  linus  "), "L");
        assert_eq!(initials(""), "??");
    }

    #[test]
    fn test_last_sync_label() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 7).unwrap();
        assert_eq!(last_sync_label(&at), "LAST SYNC: 09:05:07");

        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            last_sync_label(&at.with_timezone(&offset)),
            "LAST SYNC: 11:05:07"
        );
    }
}

//! Terminal rendering of board events.

use std::fmt::Write as _;
use std::sync::Mutex;

use chrono::{DateTime, Local, TimeZone};
use taskboard_core::sync::{BoardEvent, BoardEventHandler, PresenceEntry, Task};
use taskboard_core::view::{BoardView, last_sync_label};

/// Prints every board event to stdout.
///
/// Keeps the last task list so the board can be redrawn when the filter
/// changes without waiting for another snapshot.
#[derive(Default)]
pub struct TerminalView {
    state: Mutex<ViewState>,
}

#[derive(Default)]
struct ViewState {
    tasks: Vec<Task>,
    filter: String,
    synced_at: Option<DateTime<Local>>,
}

impl TerminalView {
    /// New view with an initial text filter.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(ViewState {
                filter: filter.into(),
                ..Default::default()
            }),
        }
    }

    /// Change the text filter and redraw.
    pub fn set_filter(&self, filter: impl Into<String>) {
        let mut state = self.lock();
        state.filter = filter.into();
        if let Some(at) = state.synced_at {
            print!("{}", render_board(&state.tasks, &state.filter, &at));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BoardEventHandler for TerminalView {
    fn on_event(&self, event: BoardEvent) {
        match event {
            BoardEvent::ConnectionStateChanged {
                state,
                display_endpoint,
            } => println!("[{}] {}", state.as_str().to_uppercase(), display_endpoint),
            BoardEvent::BoardChanged { tasks, cached } => {
                let mut state = self.lock();
                let at = Local::now();
                if cached {
                    println!("(cached snapshot)");
                }
                print!("{}", render_board(&tasks, &state.filter, &at));
                state.tasks = tasks;
                state.synced_at = Some(at);
            }
            BoardEvent::PresenceChanged(others) => println!("{}", render_presence(&others)),
            BoardEvent::EditorLivenessChanged(online) => {
                println!("Editor {}", if online { "online" } else { "offline" })
            }
            BoardEvent::StatusMessage(text) => println!("> {}", text),
        }
    }
}

/// Board as text: one section per status column, then the sync time.
pub fn render_board<Tz>(tasks: &[Task], filter: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let view = BoardView::project(tasks, filter);
    let mut out = String::new();

    if filter.trim().is_empty() {
        let _ = writeln!(out, "== Board ({} tasks) ==", view.total());
    } else {
        let _ = writeln!(
            out,
            "== Board ({} of {} tasks match {:?}) ==",
            view.total(),
            tasks.len(),
            filter.trim()
        );
    }

    for column in &view.columns {
        let _ = writeln!(out, "{} ({})", column.status, column.count());
        for card in &column.cards {
            let _ = writeln!(
                out,
                "  [{}] {}  ({} {})",
                card.priority, card.title, card.initials, card.assignee
            );
            let _ = writeln!(out, "      {}", card.description);
        }
    }
    let _ = writeln!(out, "{}", last_sync_label(at));
    out
}

/// One line naming the other connected clients.
pub fn render_presence(others: &[PresenceEntry]) -> String {
    if others.is_empty() {
        return "Nobody else is here".to_string();
    }
    let names: Vec<String> = others
        .iter()
        .map(|p| {
            let name = if p.name.is_empty() { &p.sender_id } else { &p.name };
            if p.platform.is_empty() {
                name.clone()
            } else {
                format!("{} ({})", name, p.platform)
            }
        })
        .collect();
    format!("Also here: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use taskboard_core::sync::{TaskPriority, TaskStatus};

    #[test]
    fn test_render_board() {
        let tasks = vec![
            Task {
                title: "Ship relay".to_string(),
                description: "Deploy to prod".to_string(),
                status: TaskStatus::InProgress,
                priority: TaskPriority::High,
                assignee: "Ada Lovelace".to_string(),
                ..Default::default()
            },
            Task::default(),
        ];
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();

        let text = render_board(&tasks, "", &at);
        assert!(text.starts_with("== Board (2 tasks) ==\n"));
        assert!(text.contains("InProgress (1)\n  [High] Ship relay  (AL Ada Lovelace)\n"));
        assert!(text.contains("Pending (1)\n  [Medium] Untitled Sequence  (?? Unassigned)\n"));
        assert!(text.contains("No metadata available for this task."));
        assert!(text.contains("Blocked (0)\n"));
        assert!(text.ends_with("LAST SYNC: 14:30:00\n"));

        let filtered = render_board(&tasks, "prod", &at);
        assert!(filtered.starts_with("== Board (1 of 2 tasks match \"prod\") =="));
        assert!(filtered.contains("Pending (0)\n"));
    }

    #[test]
    fn test_render_presence() {
        assert_eq!(render_presence(&[]), "Nobody else is here");
        let others = vec![
            PresenceEntry {
                sender_id: "c2".to_string(),
                name: "Bob".to_string(),
                platform: "android".to_string(),
                ..Default::default()
            },
            PresenceEntry {
                sender_id: "c3".to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(render_presence(&others), "Also here: Bob (android), c3");
    }
}

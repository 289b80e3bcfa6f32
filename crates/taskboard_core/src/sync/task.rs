//! Task values carried inside `task_sync` snapshots.
//!
//! The editor writes PascalCase keys (`Title`, `Status`, ...). `Status` and
//! `Priority` arrive either as an ordinal (0-3) or as the variant name; both
//! normalize to the enum, with unknown or missing values falling back to
//! [`TaskStatus::Pending`] and [`TaskPriority::Medium`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Board column a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Pending,
    /// Being worked on.
    InProgress,
    /// Done.
    Completed,
    /// Waiting on something else.
    Blocked,
}

impl TaskStatus {
    /// All statuses in column order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    /// Map an ordinal, a numeric string or a name; `None` when unrecognized.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Self::from_ordinal(n.as_u64()?),
            Value::String(s) => match s.as_str() {
                "Pending" => Some(Self::Pending),
                "InProgress" => Some(Self::InProgress),
                "Completed" => Some(Self::Completed),
                "Blocked" => Some(Self::Blocked),
                other => Self::from_ordinal(other.trim().parse().ok()?),
            },
            _ => None,
        }
    }

    fn from_ordinal(ordinal: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(ordinal).ok()?).copied()
    }

    /// Variant name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Blocked => "Blocked",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TaskPriority {
    /// Lowest.
    Low,
    /// Default.
    #[default]
    Medium,
    /// Elevated.
    High,
    /// Highest.
    Critical,
}

impl TaskPriority {
    /// Map an ordinal or name; `None` when unrecognized.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_u64()? {
                0 => Some(Self::Low),
                1 => Some(Self::Medium),
                2 => Some(Self::High),
                3 => Some(Self::Critical),
                _ => None,
            },
            Value::String(s) => match s.as_str() {
                "Low" => Some(Self::Low),
                "Medium" => Some(Self::Medium),
                "High" => Some(Self::High),
                "Critical" => Some(Self::Critical),
                _ => None,
            },
            _ => None,
        }
    }

    /// Variant name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from a task to an object in the editor's project.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Link {
    /// Name of the linked object.
    #[serde(deserialize_with = "lenient_string")]
    pub object_name: String,
    /// Object type; cosmetic only.
    #[serde(deserialize_with = "lenient_string")]
    pub object_type: String,
}

/// A single card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Task {
    /// Card title.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Free-text body.
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    /// Column.
    #[serde(deserialize_with = "status_or_default")]
    pub status: TaskStatus,
    /// Urgency.
    #[serde(deserialize_with = "priority_or_default")]
    pub priority: TaskPriority,
    /// Who is doing it.
    #[serde(deserialize_with = "lenient_string")]
    pub assignee: String,
    /// Who handed it out.
    #[serde(deserialize_with = "lenient_string")]
    pub assigner: String,
    /// Linked editor objects, in order.
    #[serde(deserialize_with = "links_or_default")]
    pub links: Vec<Link>,
}

fn status_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<TaskStatus, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(TaskStatus::from_value(&value).unwrap_or_default())
}

fn priority_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<TaskPriority, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(TaskPriority::from_value(&value).unwrap_or_default())
}

fn links_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Link>, D::Error> {
    Ok(Option::<Vec<Link>>::deserialize(d)?.unwrap_or_default())
}

/// Accept strings, numbers and booleans; `null` becomes empty.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

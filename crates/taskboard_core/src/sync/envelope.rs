//! Wire envelopes exchanged with the relay (JSON over WebSocket text frames).
//!
//! Inbound envelopes are decoded leniently: unknown `type` and `sender`
//! values map to catch-all variants instead of failing the frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::presence::PresenceEntry;
use super::task::Task;
use crate::error::ProtocolError;
use crate::session::{Session, VIEWER_SENDER};

/// Free-text label carried by the initial `request_sync`.
pub const INITIAL_SYNC_LABEL: &str = "Initialize Dashboard";

/// Which kind of client produced an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The authoritative editor process.
    Editor,
    /// A viewer.
    Mobile,
    /// Catch-all for senders this client doesn't know about.
    #[serde(other)]
    Other,
}

/// Envelope type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeType {
    /// A client asks the editor for a fresh snapshot.
    RequestSync,
    /// A client announces its member name.
    MemberJoin,
    /// Snapshot push.
    TaskSync,
    /// Human-readable status line.
    Status,
    /// Editor liveness change.
    EditorStatus,
    /// Catch-all for other message types
    #[serde(other)]
    Other,
}

impl EnvelopeType {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestSync => "request_sync",
            Self::MemberJoin => "member_join",
            Self::TaskSync => "task_sync",
            Self::Status => "status",
            Self::EditorStatus => "editor_status",
            Self::Other => "other",
        }
    }
}

/// Inbound envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Producer kind, absent on relay-originated messages.
    #[serde(default)]
    pub sender: Option<Sender>,
    /// Producer's client id.
    #[serde(default)]
    pub sender_id: Option<String>,
    /// Project scope. Missing is treated as empty.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Set when the envelope is meant for exactly one client.
    #[serde(default)]
    pub target_id: Option<String>,
    /// Message type.
    #[serde(rename = "type")]
    pub kind: EnvelopeType,
    /// String or object, depending on `kind`.
    #[serde(default)]
    pub payload: Value,
    /// Explicit editor liveness hint (negated).
    #[serde(default)]
    pub editor_offline: Option<bool>,
    /// Marks a `task_sync` as a replay rather than a fresh push.
    #[serde(default)]
    pub is_cached: Option<bool>,
    /// `"online"` / `"offline"` on `editor_status`.
    #[serde(default)]
    pub status: Option<String>,
}

impl Envelope {
    /// Decode a raw text frame.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(frame).map_err(ProtocolError::InvalidFrame)
    }

    /// Project scope, empty when absent.
    pub fn project_id(&self) -> &str {
        self.project_id.as_deref().unwrap_or("")
    }

    /// Target client, `None` when absent or empty.
    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|t| !t.is_empty())
    }

    /// The payload as display text.
    pub fn payload_text(&self) -> String {
        match &self.payload {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Decode the nested `task_sync` snapshot.
    ///
    /// The editor sends the snapshot as a JSON-encoded string; an inline
    /// object is accepted too. A missing, `null` or blank payload carries no
    /// snapshot and decodes to an empty [`TaskSyncPayload`].
    pub fn task_sync_payload(&self) -> Result<TaskSyncPayload, ProtocolError> {
        let invalid = |source| ProtocolError::InvalidPayload {
            kind: EnvelopeType::TaskSync.as_str(),
            source,
        };
        match &self.payload {
            Value::Null => Ok(TaskSyncPayload::default()),
            Value::String(s) if s.trim().is_empty() => Ok(TaskSyncPayload::default()),
            Value::String(s) => serde_json::from_str(s).map_err(invalid),
            other => serde_json::from_value(other.clone()).map_err(invalid),
        }
    }
}

/// Nested snapshot inside a `task_sync` payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSyncPayload {
    /// Full task list. `None` when the key is missing.
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    /// Roster of connected clients, when the relay includes one.
    #[serde(default)]
    pub active_clients: Option<Vec<PresenceEntry>>,
}

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingEnvelope {
    /// Always [`VIEWER_SENDER`].
    pub sender: &'static str,
    /// This client's id.
    pub sender_id: String,
    /// Current project.
    pub project_id: String,
    /// Platform tag.
    pub platform: String,
    /// Message type.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Free-text payload.
    pub payload: String,
}

impl OutgoingEnvelope {
    fn stamped(session: &Session, kind: EnvelopeType, payload: impl Into<String>) -> Self {
        Self {
            sender: VIEWER_SENDER,
            sender_id: session.client_id().to_string(),
            project_id: session.project_id().to_string(),
            platform: session.platform().to_string(),
            kind: kind.as_str(),
            payload: payload.into(),
        }
    }

    /// Ask the editor for a snapshot of the session's project.
    pub fn request_sync(session: &Session) -> Self {
        Self::stamped(session, EnvelopeType::RequestSync, INITIAL_SYNC_LABEL)
    }

    /// Announce the session's member name.
    pub fn member_join(session: &Session) -> Self {
        Self::stamped(session, EnvelopeType::MemberJoin, session.member_name())
    }

    /// Encode as a text frame.
    pub fn to_frame(&self) -> String {
        // Serializing a struct of strings cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

//! Inbound frame routing.
//!
//! Every text frame goes through the same steps: decode, project scope,
//! target scope, then dispatch by type into the [`BoardState`]. Frames that
//! fail to decode or fall outside this session's scope never touch state.
//! Nothing here returns an error to the caller; the client only ever sees
//! the events produced.

use super::envelope::{Envelope, EnvelopeType, Sender};
use super::events::BoardEvent;
use super::presence::PresenceTracker;
use super::store::SyncStateStore;
use crate::error::ProtocolError;
use crate::session::Session;

/// Status line shown when a snapshot arrives with no tasks.
pub const NO_TASKS_MESSAGE: &str = "No tasks found for this project.";

/// State mutated by routed envelopes.
#[derive(Debug, Default)]
pub struct BoardState {
    /// Task snapshot and editor liveness.
    pub store: SyncStateStore,
    /// Presence roster.
    pub presence: PresenceTracker,
}

impl BoardState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything held for the current project.
    pub fn clear(&mut self) {
        self.store.clear();
        self.presence.clear();
    }
}

/// Why a well-formed envelope was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// The session has no project selected.
    NoProject,
    /// The envelope belongs to another project.
    ProjectMismatch {
        /// Project the envelope was scoped to.
        project_id: String,
    },
    /// The envelope targets another client.
    TargetMismatch {
        /// Client the envelope was meant for.
        target_id: String,
    },
    /// Type this viewer doesn't act on.
    Unhandled(EnvelopeType),
}

/// Result of routing one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// The envelope was in scope; these events describe what changed.
    Applied(Vec<BoardEvent>),
    /// The envelope was dropped before touching state.
    Skipped(Skip),
}

/// Decodes frames and applies in-scope envelopes.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageRouter;

impl MessageRouter {
    /// New router.
    pub fn new() -> Self {
        Self
    }

    /// Route a frame, logging and swallowing anything that isn't applied.
    pub fn route(&self, frame: &str, session: &Session, state: &mut BoardState) -> Vec<BoardEvent> {
        match self.dispatch(frame, session, state) {
            Ok(Routed::Applied(events)) => events,
            Ok(Routed::Skipped(Skip::TargetMismatch { target_id })) => {
                log::debug!("[MessageRouter] Skipping message targeted for {}", target_id);
                Vec::new()
            }
            Ok(Routed::Skipped(skip)) => {
                log::trace!("[MessageRouter] Dropped envelope: {:?}", skip);
                Vec::new()
            }
            Err((error, events)) => {
                log::warn!("[MessageRouter] Sync packet corrupted: {}", error);
                events
            }
        }
    }

    /// Route a frame and report exactly what happened.
    ///
    /// On a payload error, the error comes back together with any events
    /// for state that was already updated before the payload was read
    /// (editor liveness on `task_sync`).
    pub fn dispatch(
        &self,
        frame: &str,
        session: &Session,
        state: &mut BoardState,
    ) -> Result<Routed, (ProtocolError, Vec<BoardEvent>)> {
        let envelope = Envelope::parse(frame).map_err(|e| (e, Vec::new()))?;

        if !session.has_project() {
            return Ok(Routed::Skipped(Skip::NoProject));
        }
        if envelope.project_id() != session.project_id() {
            return Ok(Routed::Skipped(Skip::ProjectMismatch {
                project_id: envelope.project_id().to_string(),
            }));
        }
        if let Some(target) = envelope.target_id() {
            if target != session.client_id() {
                return Ok(Routed::Skipped(Skip::TargetMismatch {
                    target_id: target.to_string(),
                }));
            }
        }

        let mut events = Vec::new();
        match envelope.kind {
            EnvelopeType::EditorStatus => {
                let status = envelope
                    .status
                    .clone()
                    .unwrap_or_else(|| envelope.payload_text());
                set_liveness(state, status == "online", &mut events);
            }
            EnvelopeType::Status => {
                events.push(BoardEvent::StatusMessage(envelope.payload_text()));
                if let Some(offline) = envelope.editor_offline {
                    set_liveness(state, !offline, &mut events);
                }
            }
            EnvelopeType::TaskSync => {
                if let Err(e) = apply_task_sync(&envelope, session, state, &mut events) {
                    return Err((e, events));
                }
            }
            other => return Ok(Routed::Skipped(Skip::Unhandled(other))),
        }
        Ok(Routed::Applied(events))
    }
}

fn set_liveness(state: &mut BoardState, online: bool, events: &mut Vec<BoardEvent>) {
    if state.store.set_editor_online(online) {
        events.push(BoardEvent::EditorLivenessChanged(online));
    }
}

fn apply_task_sync(
    envelope: &Envelope,
    session: &Session,
    state: &mut BoardState,
    events: &mut Vec<BoardEvent>,
) -> Result<(), ProtocolError> {
    if let Some(offline) = envelope.editor_offline {
        set_liveness(state, !offline, events);
    } else if envelope.sender == Some(Sender::Editor) {
        set_liveness(state, true, events);
    }

    let payload = envelope.task_sync_payload()?;

    if let Some(roster) = payload.active_clients {
        state.presence.update(roster, session.client_id());
        events.push(BoardEvent::PresenceChanged(state.presence.others().to_vec()));
    }

    let Some(tasks) = payload.tasks else {
        return Ok(());
    };
    let cached = envelope.is_cached.unwrap_or(false);
    let empty = tasks.is_empty();
    state.store.replace_tasks(tasks, cached);
    events.push(BoardEvent::BoardChanged {
        tasks: state.store.tasks().to_vec(),
        cached,
    });
    if empty {
        events.push(BoardEvent::StatusMessage(NO_TASKS_MESSAGE.to_string()));
    }
    Ok(())
}

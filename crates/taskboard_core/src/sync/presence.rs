//! Presence roster tracking.

use serde::{Deserialize, Serialize};

use super::task::lenient_string;

/// One connected client as broadcast by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresenceEntry {
    /// Client id of the connected peer.
    #[serde(alias = "SenderId", deserialize_with = "lenient_string")]
    pub sender_id: String,
    /// Display name.
    #[serde(alias = "Name", deserialize_with = "lenient_string")]
    pub name: String,
    /// Platform tag.
    #[serde(alias = "Platform", deserialize_with = "lenient_string")]
    pub platform: String,
    /// Relay-provided last-seen marker, passed through untouched.
    #[serde(alias = "LastSeen", deserialize_with = "lenient_string")]
    pub last_seen: String,
}

/// Holds the latest roster and the view of everyone except this client.
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    roster: Vec<PresenceEntry>,
    others: Vec<PresenceEntry>,
}

impl PresenceTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the roster and recompute `others`, dropping `self_id`.
    pub fn update(&mut self, roster: Vec<PresenceEntry>, self_id: &str) {
        self.others = roster
            .iter()
            .filter(|entry| entry.sender_id != self_id)
            .cloned()
            .collect();
        self.roster = roster;
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.roster.clear();
        self.others.clear();
    }

    /// Every other client, in delivery order.
    pub fn others(&self) -> &[PresenceEntry] {
        &self.others
    }

    /// The full roster as delivered, including this client.
    pub fn roster(&self) -> &[PresenceEntry] {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> PresenceEntry {
        PresenceEntry {
            sender_id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_self_is_excluded() {
        let mut tracker = PresenceTracker::new();
        tracker.update(
            vec![entry("ed1", "Editor"), entry("abc123", "Me"), entry("v2", "Bob")],
            "abc123",
        );
        let ids: Vec<_> = tracker.others().iter().map(|e| e.sender_id.as_str()).collect();
        assert_eq!(ids, vec!["ed1", "v2"]);
        assert_eq!(tracker.roster().len(), 3);
    }

    #[test]
    fn test_duplicate_self_entries_are_all_excluded() {
        let mut tracker = PresenceTracker::new();
        tracker.update(vec![entry("abc123", "Me"), entry("abc123", "Me again")], "abc123");
        assert!(tracker.others().is_empty());
    }

    #[test]
    fn test_empty_update_clears() {
        let mut tracker = PresenceTracker::new();
        tracker.update(vec![entry("ed1", "Editor")], "abc123");
        tracker.update(vec![], "abc123");
        assert!(tracker.others().is_empty());
        assert!(tracker.roster().is_empty());
    }

    #[test]
    fn test_deserialize_either_casing() {
        let camel: PresenceEntry =
            serde_json::from_str(r#"{"senderId": "a", "name": "A", "lastSeen": 1700000000}"#)
                .unwrap();
        assert_eq!(camel.sender_id, "a");
        assert_eq!(camel.last_seen, "1700000000");

        let pascal: PresenceEntry =
            serde_json::from_str(r#"{"SenderId": "b", "Name": "B", "Platform": "ios"}"#).unwrap();
        assert_eq!(pascal.sender_id, "b");
        assert_eq!(pascal.platform, "ios");
    }
}

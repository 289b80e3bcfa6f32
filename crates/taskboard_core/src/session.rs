//! Session identity.
//!
//! A [`Session`] is created once per process. `client_id` never changes;
//! `project_id` and `member_name` change only through a project switch.

/// Sender kind stamped on every outbound envelope from this client.
pub const VIEWER_SENDER: &str = "mobile";

/// Identity of this viewer for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    client_id: String,
    project_id: String,
    member_name: String,
    platform: String,
}

impl Session {
    /// Create a session with a freshly generated client id.
    pub fn new(
        project_id: impl Into<String>,
        member_name: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self::with_client_id(generate_client_id(), project_id, member_name, platform)
    }

    /// Create a session with a caller-supplied client id.
    pub fn with_client_id(
        client_id: impl Into<String>,
        project_id: impl Into<String>,
        member_name: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            project_id: project_id.into().trim().to_string(),
            member_name: member_name.into().trim().to_string(),
            platform: platform.into(),
        }
    }

    /// Opaque id of this client.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Currently selected project, empty when none.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Display name, empty when anonymous.
    pub fn member_name(&self) -> &str {
        &self.member_name
    }

    /// Platform tag.
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// Whether a project is selected.
    pub fn has_project(&self) -> bool {
        !self.project_id.is_empty()
    }

    /// Replace project and member name. Returns `true` if the project changed.
    ///
    /// Only [`crate::sync::BoardClient`] calls this, as part of a project
    /// switch that also clears synchronized state.
    pub(crate) fn switch_project(
        &mut self,
        project_id: impl Into<String>,
        member_name: impl Into<String>,
    ) -> bool {
        let project_id = project_id.into().trim().to_string();
        let changed = project_id != self.project_id;
        self.project_id = project_id;
        self.member_name = member_name.into().trim().to_string();
        changed
    }
}

/// Short opaque client id: nine lowercase alphanumerics from a v4 UUID.
fn generate_client_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..9].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_short_and_distinct() {
        let a = Session::new("P1", "", "cli");
        let b = Session::new("P1", "", "cli");
        assert_eq!(a.client_id().len(), 9);
        assert_ne!(a.client_id(), b.client_id());
    }

    #[test]
    fn test_fields_are_trimmed() {
        let session = Session::with_client_id("abc123", "  P1 ", " Ada ", "cli");
        assert_eq!(session.project_id(), "P1");
        assert_eq!(session.member_name(), "Ada");
        assert!(session.has_project());
    }

    #[test]
    fn test_switch_project_keeps_client_id() {
        let mut session = Session::with_client_id("abc123", "P1", "Ada", "cli");
        assert!(session.switch_project("P2", "Grace"));
        assert_eq!(session.client_id(), "abc123");
        assert_eq!(session.project_id(), "P2");
        assert_eq!(session.member_name(), "Grace");

        assert!(!session.switch_project("P2", "Grace Hopper"));
        assert_eq!(session.member_name(), "Grace Hopper");
    }

    #[test]
    fn test_empty_project() {
        let session = Session::with_client_id("abc123", "", "", "cli");
        assert!(!session.has_project());
    }
}

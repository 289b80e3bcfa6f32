//! `taskboard config`: show or change saved settings.

use taskboard_core::config::{Config, normalize_ws_url};
use taskboard_core::error::ConfigError;

/// Requested edits; `None` leaves a setting unchanged.
#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub project: Option<String>,
    pub name: Option<String>,
    pub server: Option<String>,
    pub local_url: Option<String>,
    pub use_local: Option<bool>,
    pub interval: Option<u64>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.project.is_none()
            && self.name.is_none()
            && self.server.is_none()
            && self.local_url.is_none()
            && self.use_local.is_none()
            && self.interval.is_none()
    }
}

/// Handle the config command. Returns `false` on failure.
pub fn handle_config(config: &Config, changes: ConfigChanges, show: bool) -> bool {
    if show || changes.is_empty() {
        print_config(config);
        return true;
    }

    let (new_config, applied) = match apply_changes(config, changes) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return false;
        }
    };

    if applied.is_empty() {
        println!("No changes made.");
        return true;
    }

    match new_config.save() {
        Ok(()) => {
            println!("Configuration updated:");
            for change in applied {
                println!("  {}", change);
            }
            true
        }
        Err(e) => {
            eprintln!("Failed to save configuration: {}", e);
            false
        }
    }
}

fn print_config(config: &Config) {
    println!("Taskboard Configuration");
    println!("=======================");
    println!();
    if let Some(path) = Config::config_path() {
        println!("File: {}", path.display());
    }
    println!("Remote relay: {}", config.remote_url);
    println!("Local relay: {}", config.local_url);
    println!(
        "Active relay: {}",
        if config.use_local { "local" } else { "remote" }
    );
    println!("Reconnect interval: {}s", config.reconnect_interval().as_secs());
    println!(
        "Project: {}",
        config.project_id.as_deref().unwrap_or("(not set)")
    );
    println!(
        "Member name: {}",
        config.member_name.as_deref().unwrap_or("(not set)")
    );
}

/// Apply `changes` to a copy of `config`, describing each applied change.
fn apply_changes(
    config: &Config,
    changes: ConfigChanges,
) -> Result<(Config, Vec<String>), ConfigError> {
    let mut new_config = config.clone();
    let mut applied = Vec::new();

    if let Some(project) = changes.project {
        let project = project.trim().to_string();
        applied.push(format!("Project: {}", display_or_unset(&project)));
        new_config.project_id = (!project.is_empty()).then_some(project);
    }

    if let Some(name) = changes.name {
        let name = name.trim().to_string();
        applied.push(format!("Member name: {}", display_or_unset(&name)));
        new_config.member_name = (!name.is_empty()).then_some(name);
    }

    if let Some(server) = changes.server {
        let url = normalize_ws_url(&server)?;
        applied.push(format!("Remote relay: {}", url));
        new_config.remote_url = url;
    }

    if let Some(local_url) = changes.local_url {
        let url = normalize_ws_url(&local_url)?;
        applied.push(format!("Local relay: {}", url));
        new_config.local_url = url;
    }

    if let Some(use_local) = changes.use_local {
        applied.push(format!("Use local relay: {}", use_local));
        new_config.use_local = use_local;
    }

    if let Some(interval) = changes.interval {
        new_config.reconnect_interval_secs = interval.max(1);
        applied.push(format!(
            "Reconnect interval: {}s",
            new_config.reconnect_interval_secs
        ));
    }

    Ok((new_config, applied))
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_identity_changes() {
        let config = Config::default();
        let (updated, applied) = apply_changes(
            &config,
            ConfigChanges {
                project: Some(" P1 ".to_string()),
                name: Some("Ada".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.project_id.as_deref(), Some("P1"));
        assert_eq!(updated.member_name.as_deref(), Some("Ada"));
        assert_eq!(applied, vec!["Project: P1", "Member name: Ada"]);
    }

    #[test]
    fn test_empty_project_clears_it() {
        let config = Config {
            project_id: Some("P1".to_string()),
            ..Default::default()
        };
        let (updated, applied) = apply_changes(
            &config,
            ConfigChanges {
                project: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.project_id, None);
        assert_eq!(applied, vec!["Project: (not set)"]);
    }

    #[test]
    fn test_server_url_is_normalized() {
        let (updated, _) = apply_changes(
            &Config::default(),
            ConfigChanges {
                server: Some("https://relay.example.com".to_string()),
                interval: Some(0),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(updated.remote_url, "wss://relay.example.com");
        assert_eq!(updated.reconnect_interval_secs, 1);
    }

    #[test]
    fn test_invalid_server_url_is_rejected() {
        let result = apply_changes(
            &Config::default(),
            ConfigChanges {
                server: Some("ftp://relay.example.com".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }
}

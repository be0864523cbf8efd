//! Release-event payloads received from the hosting provider
//!
//! Only the fields the agent consumes are modeled; the provider sends much
//! larger payloads and unknown fields are ignored.

use serde::Deserialize;

/// Action value that marks a release as published
pub const RELEASED_ACTION: &str = "released";

/// A release webhook event
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseEvent {
    pub action: String,
    pub repository: EventRepository,
    pub release: EventRelease,
}

/// Repository block of a release event
#[derive(Debug, Clone, Deserialize)]
pub struct EventRepository {
    pub ssh_url: String,
}

/// Release block of a release event
#[derive(Debug, Clone, Deserialize)]
pub struct EventRelease {
    pub tag_name: String,
}

impl ReleaseEvent {
    /// Whether this event announces a published release
    ///
    /// The provider also delivers `created`, `edited`, `prereleased` and
    /// similar actions on the same hook; only `released` triggers a deploy.
    pub fn is_release_publication(&self) -> bool {
        self.action == RELEASED_ACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_release_event() {
        let body = r#"{
            "action": "released",
            "repository": { "ssh_url": "git@example.com:org/app.git", "name": "app" },
            "release": { "tag_name": "v1.0", "draft": false }
        }"#;

        let event: ReleaseEvent = serde_json::from_str(body).unwrap();
        assert!(event.is_release_publication());
        assert_eq!(event.repository.ssh_url, "git@example.com:org/app.git");
        assert_eq!(event.release.tag_name, "v1.0");
    }

    #[test]
    fn test_non_release_action_is_filtered() {
        let body = r#"{
            "action": "prereleased",
            "repository": { "ssh_url": "git@example.com:org/app.git" },
            "release": { "tag_name": "v1.0-rc1" }
        }"#;

        let event: ReleaseEvent = serde_json::from_str(body).unwrap();
        assert!(!event.is_release_publication());
    }
}

//! Users system client
//!
//! Supplies per-track roles of a user and track metadata (the submission
//! deadline). Role names on the wire are the Users system's vocabulary and
//! are mapped to the three internal roles; an unrecognized name is a fatal
//! parse error, not a silent skip.

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Internal role of a user with respect to a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Chair,
    Author,
    Reviewer,
}

impl Role {
    /// Map a Users-system role name to the internal role
    pub fn from_external(name: &str) -> Result<Self> {
        match name {
            "PC Chair" | "General Chair" => Ok(Role::Chair),
            "Author" => Ok(Role::Author),
            "PC Member" | "Sub-reviewer" => Ok(Role::Reviewer),
            other => Err(AppError::UpstreamPayload {
                service: "users".to_string(),
                message: format!("unknown role name: {}", other),
            }),
        }
    }
}

/// A role a user holds on one track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackRole {
    pub conference_id: i64,
    pub track_id: i64,
    pub role: Role,
}

impl TrackRole {
    /// Whether this entry grants `role` on the given track
    pub fn grants(&self, conference_id: i64, track_id: i64, role: Role) -> bool {
        self.conference_id == conference_id && self.track_id == track_id && self.role == role
    }
}

/// Track metadata owned by the Users system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalTrack {
    pub submission_deadline: DateTime<Utc>,
}

/// Read-only contract to the Users system
#[async_trait]
pub trait UsersPort: Send + Sync {
    /// All roles the user holds, across all tracks
    async fn roles_of_user(&self, user_id: i64) -> Result<Vec<TrackRole>>;

    /// Track metadata; `TrackNotFound` when the track does not exist
    async fn track(&self, conference_id: i64, track_id: i64) -> Result<ExternalTrack>;
}

/// Wire format of one role entry
#[derive(Debug, Deserialize)]
struct RoleEntry {
    #[serde(rename = "eventId")]
    event_id: i64,
    #[serde(rename = "trackId")]
    track_id: i64,
    #[serde(rename = "roleName")]
    role_name: String,
}

/// Wire format of the track endpoint
#[derive(Debug, Deserialize)]
struct TrackEntry {
    #[serde(rename = "submissionDeadline")]
    submission_deadline: DateTime<Utc>,
}

/// reqwest-backed Users client
#[derive(Clone)]
pub struct HttpUsersClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUsersClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl UsersPort for HttpUsersClient {
    async fn roles_of_user(&self, user_id: i64) -> Result<Vec<TrackRole>> {
        let url = format!("{}/users/{}/roles", self.base_url, user_id);

        let start = std::time::Instant::now();
        let sent = self.client.get(&url).send().await;
        crate::metrics::record_upstream_call("users", start.elapsed().as_secs_f64(), sent.is_ok());
        let response = sent?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamPayload {
                service: "users".to_string(),
                message: format!("roles lookup returned {}", response.status()),
            });
        }

        let entries: Vec<RoleEntry> = response.json().await?;

        entries
            .into_iter()
            .map(|entry| {
                Ok(TrackRole {
                    conference_id: entry.event_id,
                    track_id: entry.track_id,
                    role: Role::from_external(&entry.role_name)?,
                })
            })
            .collect()
    }

    async fn track(&self, conference_id: i64, track_id: i64) -> Result<ExternalTrack> {
        let url = format!(
            "{}/conferences/{}/tracks/{}",
            self.base_url, conference_id, track_id
        );

        let start = std::time::Instant::now();
        let sent = self.client.get(&url).send().await;
        crate::metrics::record_upstream_call("users", start.elapsed().as_secs_f64(), sent.is_ok());
        let response = sent?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::TrackNotFound {
                conference_id,
                track_id,
            });
        }

        if !response.status().is_success() {
            return Err(AppError::UpstreamPayload {
                service: "users".to_string(),
                message: format!("track lookup returned {}", response.status()),
            });
        }

        let entry: TrackEntry = response.json().await?;

        Ok(ExternalTrack {
            submission_deadline: entry.submission_deadline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        assert_eq!(Role::from_external("PC Chair").unwrap(), Role::Chair);
        assert_eq!(Role::from_external("General Chair").unwrap(), Role::Chair);
        assert_eq!(Role::from_external("Author").unwrap(), Role::Author);
        assert_eq!(Role::from_external("PC Member").unwrap(), Role::Reviewer);
        assert_eq!(Role::from_external("Sub-reviewer").unwrap(), Role::Reviewer);
    }

    #[test]
    fn test_unknown_role_is_fatal() {
        let err = Role::from_external("Janitor").unwrap_err();
        assert!(err.is_server_error());
    }

    #[test]
    fn test_role_entry_wire_format() {
        let json = r#"[{"eventId": 3, "trackId": 7, "roleName": "PC Member"}]"#;
        let entries: Vec<RoleEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].event_id, 3);
        assert_eq!(entries[0].track_id, 7);
        assert_eq!(Role::from_external(&entries[0].role_name).unwrap(), Role::Reviewer);
    }

    #[test]
    fn test_grants() {
        let entry = TrackRole {
            conference_id: 1,
            track_id: 2,
            role: Role::Chair,
        };
        assert!(entry.grants(1, 2, Role::Chair));
        assert!(!entry.grants(1, 2, Role::Reviewer));
        assert!(!entry.grants(1, 3, Role::Chair));
    }
}

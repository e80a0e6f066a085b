//! Submissions system client
//!
//! Supplies submission metadata: owning track, authors, and the declared
//! conflict-of-interest list.

use crate::errors::{AppError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// A submission as owned by the external Submissions system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,

    #[serde(rename = "eventId")]
    pub event_id: i64,

    #[serde(rename = "trackId")]
    pub track_id: i64,

    #[serde(default)]
    pub authors: Vec<i64>,

    /// User ids barred from reviewing this submission
    #[serde(rename = "conflictsOfInterest", default)]
    pub conflicts_of_interest: Vec<i64>,

    pub title: String,

    #[serde(rename = "abstract", default)]
    pub abstract_text: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    /// Base64-encoded paper bytes; omitted in list responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper: Option<String>,
}

impl Submission {
    /// Whether the user appears on the declared COI list
    pub fn has_conflict_with(&self, user_id: i64) -> bool {
        self.conflicts_of_interest.contains(&user_id)
    }

    /// Whether the user is one of the authors
    pub fn is_author(&self, user_id: i64) -> bool {
        self.authors.contains(&user_id)
    }
}

/// Read-only contract to the Submissions system
#[async_trait]
pub trait SubmissionsPort: Send + Sync {
    /// Submission metadata; `SubmissionNotFound` when absent
    async fn submission(&self, paper_id: i64) -> Result<Submission>;

    /// All submissions in a track, as visible to the requester
    async fn submissions_in_track(
        &self,
        conference_id: i64,
        track_id: i64,
        requester_id: i64,
    ) -> Result<Vec<Submission>>;
}

/// reqwest-backed Submissions client
#[derive(Clone)]
pub struct HttpSubmissionsClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSubmissionsClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl SubmissionsPort for HttpSubmissionsClient {
    async fn submission(&self, paper_id: i64) -> Result<Submission> {
        let url = format!("{}/submissions/{}", self.base_url, paper_id);

        let start = std::time::Instant::now();
        let sent = self.client.get(&url).send().await;
        crate::metrics::record_upstream_call(
            "submissions",
            start.elapsed().as_secs_f64(),
            sent.is_ok(),
        );
        let response = sent?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::SubmissionNotFound { id: paper_id });
        }

        if !response.status().is_success() {
            return Err(AppError::UpstreamPayload {
                service: "submissions".to_string(),
                message: format!("submission lookup returned {}", response.status()),
            });
        }

        response.json().await.map_err(Into::into)
    }

    async fn submissions_in_track(
        &self,
        conference_id: i64,
        track_id: i64,
        requester_id: i64,
    ) -> Result<Vec<Submission>> {
        let url = format!(
            "{}/conferences/{}/tracks/{}/submissions",
            self.base_url, conference_id, track_id
        );

        let start = std::time::Instant::now();
        let sent = self
            .client
            .get(&url)
            .query(&[("requester", requester_id)])
            .send()
            .await;
        crate::metrics::record_upstream_call(
            "submissions",
            start.elapsed().as_secs_f64(),
            sent.is_ok(),
        );
        let response = sent?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::TrackNotFound {
                conference_id,
                track_id,
            });
        }

        if !response.status().is_success() {
            return Err(AppError::UpstreamPayload {
                service: "submissions".to_string(),
                message: format!("track submissions lookup returned {}", response.status()),
            });
        }

        response.json().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_format() {
        let json = r#"{
            "id": 12,
            "eventId": 1,
            "trackId": 4,
            "authors": [100, 101],
            "conflictsOfInterest": [200],
            "title": "On Derived Workflow State",
            "abstract": "We derive, rather than store.",
            "keywords": ["workflow", "phases"]
        }"#;

        let submission: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(submission.id, 12);
        assert_eq!(submission.event_id, 1);
        assert_eq!(submission.track_id, 4);
        assert!(submission.is_author(100));
        assert!(submission.has_conflict_with(200));
        assert!(!submission.has_conflict_with(100));
        assert_eq!(submission.paper, None);
    }

    #[test]
    fn test_submission_minimal_fields() {
        let json = r#"{"id": 1, "eventId": 2, "trackId": 3, "title": "T"}"#;
        let submission: Submission = serde_json::from_str(json).unwrap();
        assert!(submission.authors.is_empty());
        assert!(submission.conflicts_of_interest.is_empty());
        assert_eq!(submission.abstract_text, "");
    }
}

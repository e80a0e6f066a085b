//! Track-level operations: bidding deadline policy and analytics

use crate::db::models::PaperStatus;
use crate::db::Repository;
use crate::errors::Result;
use crate::workflow::phase::PhaseService;
use crate::workflow::verification::VerificationService;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome counts of a track's papers
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrackAnalytics {
    pub papers: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub not_decided: usize,
}

#[derive(Clone)]
pub struct TrackService {
    repo: Repository,
    phases: PhaseService,
    verification: VerificationService,
}

impl TrackService {
    pub fn new(repo: Repository, phases: PhaseService, verification: VerificationService) -> Self {
        Self {
            repo,
            phases,
            verification,
        }
    }

    /// Chair sets the bidding deadline of a track
    pub async fn set_bidding_deadline(
        &self,
        requester_id: i64,
        conference_id: i64,
        track_id: i64,
        deadline: DateTime<Utc>,
    ) -> Result<()> {
        self.verification
            .verify_is_chair(requester_id, conference_id, track_id)
            .await?;

        self.repo
            .set_bidding_deadline(conference_id, track_id, deadline)
            .await?;

        tracing::info!(conference_id, track_id, deadline = %deadline, "Bidding deadline set");
        Ok(())
    }

    /// The effective bidding deadline; materializes the +2-day default on
    /// first request
    pub async fn bidding_deadline(
        &self,
        conference_id: i64,
        track_id: i64,
    ) -> Result<DateTime<Utc>> {
        self.phases
            .effective_bidding_deadline(conference_id, track_id)
            .await
    }

    /// Outcome counts of the track's papers; chairs only
    pub async fn analytics(
        &self,
        requester_id: i64,
        conference_id: i64,
        track_id: i64,
    ) -> Result<TrackAnalytics> {
        self.verification
            .verify_is_chair(requester_id, conference_id, track_id)
            .await?;

        let papers = self.repo.papers_in_track(conference_id, track_id).await?;

        let mut analytics = TrackAnalytics {
            papers: papers.len(),
            accepted: 0,
            rejected: 0,
            not_decided: 0,
        };

        for paper in &papers {
            match paper.paper_status() {
                PaperStatus::Accepted => analytics.accepted += 1,
                PaperStatus::Rejected => analytics.rejected += 1,
                PaperStatus::NotDecided => analytics.not_decided += 1,
            }
        }

        Ok(analytics)
    }
}

//! Phase calculators
//!
//! Track and paper phase are derived values: deterministic functions of the
//! external deadlines and the locally persisted assignment/finalization
//! flags. They are recomputed on every query and never cached across
//! requests, so they cannot desynchronize from their inputs.
//!
//! The pure calculators live at the top of this module; [`PhaseService`]
//! gathers their inputs from the repository and the external ports.

use crate::clients::{SubmissionsPort, UsersPort};
use crate::clock::Clock;
use crate::db::models::{Paper, Review, Track};
use crate::db::Repository;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Workflow stage of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackPhase {
    Submitting,
    Bidding,
    Assigning,
    Reviewing,
    Final,
}

/// Workflow stage of a paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaperPhase {
    BeforeReview,
    InReview,
    InDiscussion,
    Reviewed,
}

/// Compute the phase of a paper. Ordered, first match wins.
///
/// `reviews_submitted` carries one entry per assigned review, true once that
/// review has a confidence score.
pub fn paper_phase(
    reviewers_finalized: bool,
    reviews_submitted: &[bool],
    reviews_finalized: bool,
) -> PaperPhase {
    if !reviewers_finalized {
        return PaperPhase::BeforeReview;
    }
    if reviews_submitted.iter().any(|submitted| !submitted) {
        return PaperPhase::InReview;
    }
    if !reviews_finalized {
        return PaperPhase::InDiscussion;
    }
    PaperPhase::Reviewed
}

/// Compute the phase of a track. Ordered, first match wins.
///
/// Deadline comparisons are inclusive: a request at the exact deadline
/// timestamp is still within the earlier phase. An unset bidding deadline
/// keeps the track in `BIDDING` until the default is materialized.
pub fn track_phase(
    now: DateTime<Utc>,
    submission_deadline: DateTime<Utc>,
    bidding_deadline: Option<DateTime<Utc>>,
    reviewers_finalized: bool,
    all_papers_reviewed: bool,
) -> TrackPhase {
    if now <= submission_deadline {
        return TrackPhase::Submitting;
    }
    match bidding_deadline {
        None => return TrackPhase::Bidding,
        Some(deadline) if now <= deadline => return TrackPhase::Bidding,
        Some(_) => {}
    }
    if !reviewers_finalized {
        return TrackPhase::Assigning;
    }
    if !all_papers_reviewed {
        return TrackPhase::Reviewing;
    }
    TrackPhase::Final
}

/// Phase of a paper from its persisted rows, given the owning track's
/// assignment flag
fn paper_phase_of(reviewers_finalized: bool, paper: Option<&Paper>, reviews: &[Review]) -> PaperPhase {
    let submitted: Vec<bool> = reviews.iter().map(Review::is_submitted).collect();
    let finalized = paper.map(|p| p.reviews_finalized).unwrap_or(false);
    paper_phase(reviewers_finalized, &submitted, finalized)
}

/// Computes phases on demand from live data
#[derive(Clone)]
pub struct PhaseService {
    repo: Repository,
    users: Arc<dyn UsersPort>,
    submissions: Arc<dyn SubmissionsPort>,
    clock: Arc<dyn Clock>,
}

impl PhaseService {
    pub fn new(
        repo: Repository,
        users: Arc<dyn UsersPort>,
        submissions: Arc<dyn SubmissionsPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            users,
            submissions,
            clock,
        }
    }

    /// Current phase of a track.
    ///
    /// Fails with `TrackNotFound` when the Users system does not know the
    /// track. The local mirror row is created on first access.
    pub async fn track_phase(&self, conference_id: i64, track_id: i64) -> Result<TrackPhase> {
        let external = self.users.track(conference_id, track_id).await?;
        let local = self.repo.ensure_track(conference_id, track_id).await?;

        let all_reviewed = self.all_papers_reviewed(&local).await?;

        Ok(track_phase(
            self.clock.now(),
            external.submission_deadline,
            local.bidding_deadline.map(Into::into),
            local.reviewers_finalized,
            all_reviewed,
        ))
    }

    /// Current phase of a paper.
    ///
    /// Fails with `SubmissionNotFound` when the owning track cannot be
    /// resolved through the Submissions system.
    pub async fn paper_phase(&self, paper_id: i64) -> Result<PaperPhase> {
        let submission = self.submissions.submission(paper_id).await?;
        let track = self
            .repo
            .ensure_track(submission.event_id, submission.track_id)
            .await?;

        let paper = self.repo.find_paper(paper_id).await?;
        let reviews = self.repo.reviews_for_paper(paper_id).await?;

        Ok(paper_phase_of(
            track.reviewers_finalized,
            paper.as_ref(),
            &reviews,
        ))
    }

    /// Whether every locally known paper of the track has reached `REVIEWED`.
    ///
    /// A track with no papers is vacuously done reviewing.
    async fn all_papers_reviewed(&self, track: &Track) -> Result<bool> {
        let papers = self
            .repo
            .papers_in_track(track.conference_id, track.track_id)
            .await?;

        for paper in &papers {
            let reviews = self.repo.reviews_for_paper(paper.id).await?;
            let phase = paper_phase_of(track.reviewers_finalized, Some(paper), &reviews);
            if phase != PaperPhase::Reviewed {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// The effective bidding deadline of a track.
    ///
    /// When unset, the fixed default (submission deadline + 2 days) is
    /// computed on this first request and then persisted.
    pub async fn effective_bidding_deadline(
        &self,
        conference_id: i64,
        track_id: i64,
    ) -> Result<DateTime<Utc>> {
        let local = self.repo.ensure_track(conference_id, track_id).await?;

        if let Some(deadline) = local.bidding_deadline {
            return Ok(deadline.into());
        }

        let external = self.users.track(conference_id, track_id).await?;
        let default =
            external.submission_deadline + chrono::Duration::days(crate::DEFAULT_BIDDING_WINDOW_DAYS);

        tracing::info!(
            conference_id,
            track_id,
            deadline = %default,
            "Materializing default bidding deadline"
        );

        let updated = self
            .repo
            .set_bidding_deadline(conference_id, track_id, default)
            .await?;

        Ok(updated
            .bidding_deadline
            .map(Into::into)
            .unwrap_or(default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_paper_phase_before_assignment_finalized() {
        // Review rows may already exist; the track flag alone decides.
        assert_eq!(paper_phase(false, &[], false), PaperPhase::BeforeReview);
        assert_eq!(paper_phase(false, &[true, true], false), PaperPhase::BeforeReview);
        assert_eq!(paper_phase(false, &[true], true), PaperPhase::BeforeReview);
    }

    #[test]
    fn test_paper_phase_in_review_until_all_submitted() {
        assert_eq!(paper_phase(true, &[true, false, true], false), PaperPhase::InReview);
        assert_eq!(paper_phase(true, &[false], false), PaperPhase::InReview);
    }

    #[test]
    fn test_paper_phase_discussion_then_reviewed() {
        assert_eq!(paper_phase(true, &[true, true], false), PaperPhase::InDiscussion);
        assert_eq!(paper_phase(true, &[true, true], true), PaperPhase::Reviewed);
    }

    #[test]
    fn test_track_phase_submission_boundary_inclusive() {
        let deadline = at(1_000);
        // At the exact deadline timestamp the track is still SUBMITTING.
        assert_eq!(
            track_phase(deadline, deadline, None, false, false),
            TrackPhase::Submitting
        );
        // One second later it is BIDDING (bidding deadline unset).
        assert_eq!(
            track_phase(at(1_001), deadline, None, false, false),
            TrackPhase::Bidding
        );
    }

    #[test]
    fn test_track_phase_bidding_boundary_inclusive() {
        let submission = at(1_000);
        let bidding = at(2_000);
        assert_eq!(
            track_phase(at(2_000), submission, Some(bidding), false, false),
            TrackPhase::Bidding
        );
        assert_eq!(
            track_phase(at(2_001), submission, Some(bidding), false, false),
            TrackPhase::Assigning
        );
    }

    #[test]
    fn test_track_phase_unset_bidding_deadline_stays_bidding() {
        assert_eq!(
            track_phase(at(9_999_999), at(1_000), None, true, true),
            TrackPhase::Bidding
        );
    }

    #[test]
    fn test_track_phase_reviewing_until_all_papers_reviewed() {
        let submission = at(1_000);
        let bidding = at(2_000);
        assert_eq!(
            track_phase(at(3_000), submission, Some(bidding), true, false),
            TrackPhase::Reviewing
        );
        assert_eq!(
            track_phase(at(3_000), submission, Some(bidding), true, true),
            TrackPhase::Final
        );
    }

    #[test]
    fn test_track_phase_monotonic_in_time() {
        // For fixed deadlines and completed data, phases only advance as the
        // clock moves forward.
        let submission = at(1_000);
        let bidding = at(2_000);

        let mut previous = TrackPhase::Submitting;
        for secs in [0, 500, 1_000, 1_001, 1_999, 2_000, 2_001, 10_000] {
            let phase = track_phase(at(secs), submission, Some(bidding), true, true);
            assert!(phase >= previous, "phase regressed at t={}", secs);
            previous = phase;
        }
        assert_eq!(previous, TrackPhase::Final);
    }

    #[test]
    fn test_phase_functions_are_pure() {
        // Identical inputs, identical outputs.
        let args = (at(1_500), at(1_000), Some(at(2_000)), false, false);
        assert_eq!(
            track_phase(args.0, args.1, args.2, args.3, args.4),
            track_phase(args.0, args.1, args.2, args.3, args.4)
        );
        assert_eq!(
            paper_phase(true, &[true, false], false),
            paper_phase(true, &[true, false], false)
        );
    }
}

//! Assignment strategy
//!
//! Automatic assignment selects, per paper, the three bidders carrying the
//! smallest review load. Load is counted across the entire system, not just
//! the current track: the algorithm balances reviewers globally. Ties are
//! broken by bidder iteration order, so the selection is stable, never
//! randomized.

use crate::clients::SubmissionsPort;
use crate::db::models::Paper;
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::workflow::phase::{PhaseService, TrackPhase};
use crate::workflow::rules;
use crate::workflow::verification::VerificationService;
use serde::Serialize;
use std::sync::Arc;

/// Select the `per_paper` bidders with the smallest loads.
///
/// Input order is preserved on equal loads (stable sort), so the caller's
/// bidder iteration order is the tie-break.
pub fn select_reviewers(bidders: &[(i64, u64)], per_paper: usize) -> Vec<i64> {
    let mut ranked: Vec<(i64, u64)> = bidders.to_vec();
    ranked.sort_by_key(|&(_, load)| load);
    ranked
        .into_iter()
        .take(per_paper)
        .map(|(bidder, _)| bidder)
        .collect()
}

/// Outcome of one automatic assignment run, per paper
#[derive(Debug, Clone, Serialize)]
pub struct PaperAssignment {
    pub paper_id: i64,
    pub reviewer_ids: Vec<i64>,
}

/// Creates review assignments, automatically or manually
#[derive(Clone)]
pub struct AssignmentService {
    repo: Repository,
    submissions: Arc<dyn SubmissionsPort>,
    phases: PhaseService,
    verification: VerificationService,
}

impl AssignmentService {
    pub fn new(
        repo: Repository,
        submissions: Arc<dyn SubmissionsPort>,
        phases: PhaseService,
        verification: VerificationService,
    ) -> Self {
        Self {
            repo,
            submissions,
            phases,
            verification,
        }
    }

    /// Assign reviewers to every paper of a track from its bids.
    ///
    /// Requires a chair during `ASSIGNING`. Every paper must have at least
    /// one bidder; this is validated for the whole track before any review
    /// row is written, so a zero-bidder paper leaves the track untouched.
    /// No COI check happens here: bidders are assumed pre-filtered.
    pub async fn assign_automatically(
        &self,
        requester_id: i64,
        conference_id: i64,
        track_id: i64,
    ) -> Result<Vec<PaperAssignment>> {
        self.verification
            .verify_is_chair(requester_id, conference_id, track_id)
            .await?;
        let phase = self.phases.track_phase(conference_id, track_id).await?;
        rules::require_track_phase(phase, TrackPhase::Assigning)?;

        let submissions = self
            .submissions
            .submissions_in_track(conference_id, track_id, requester_id)
            .await?;

        // Validate the whole track before persisting anything.
        let mut track_bids = Vec::with_capacity(submissions.len());
        for submission in &submissions {
            let bids = self.repo.bids_for_paper(submission.id).await?;
            if bids.is_empty() {
                return Err(AppError::NoBidders {
                    paper_id: submission.id,
                });
            }
            track_bids.push(bids);
        }

        let mut assignments = Vec::with_capacity(submissions.len());

        for (submission, bids) in submissions.iter().zip(track_bids) {
            // Loads are re-read per paper so that selections made for
            // earlier papers in this run count toward later ones.
            let mut bidders = Vec::with_capacity(bids.len());
            for bid in &bids {
                let load = self.repo.reviewer_load(bid.bidder_id).await?;
                bidders.push((bid.bidder_id, load));
            }

            let selected = select_reviewers(&bidders, crate::REVIEWERS_PER_PAPER);

            self.repo
                .ensure_paper(submission.id, conference_id, track_id)
                .await?;
            for &reviewer_id in &selected {
                self.repo.create_empty_review(submission.id, reviewer_id).await?;
            }

            tracing::info!(
                paper_id = submission.id,
                reviewers = ?selected,
                "Automatically assigned reviewers"
            );
            crate::metrics::record_assignment(selected.len(), "auto");

            assignments.push(PaperAssignment {
                paper_id: submission.id,
                reviewer_ids: selected,
            });
        }

        Ok(assignments)
    }

    /// Assign one reviewer to one paper, chair-initiated.
    ///
    /// Goes through the full verification (phase, roles, COI) and creates
    /// the empty review row representing the assignment.
    pub async fn assign_manually(
        &self,
        requester_id: i64,
        paper_id: i64,
        reviewer_id: i64,
    ) -> Result<()> {
        let submission = self
            .verification
            .verify_can_assign(requester_id, paper_id, reviewer_id)
            .await?;

        self.repo
            .ensure_paper(paper_id, submission.event_id, submission.track_id)
            .await?;
        self.repo.create_empty_review(paper_id, reviewer_id).await?;

        tracing::info!(paper_id, reviewer_id, "Manually assigned reviewer");
        crate::metrics::record_assignment(1, "manual");

        Ok(())
    }

    /// Chair marks reviewer assignment complete for the track, moving it
    /// out of `ASSIGNING`
    pub async fn finalize_assignments(
        &self,
        requester_id: i64,
        conference_id: i64,
        track_id: i64,
    ) -> Result<()> {
        self.verification
            .verify_is_chair(requester_id, conference_id, track_id)
            .await?;
        let phase = self.phases.track_phase(conference_id, track_id).await?;
        rules::require_track_phase(phase, TrackPhase::Assigning)?;

        self.repo
            .set_reviewers_finalized(conference_id, track_id)
            .await?;

        tracing::info!(conference_id, track_id, "Reviewer assignment finalized");
        Ok(())
    }

    /// Reviewers assigned to a paper; visible to chairs and assigned
    /// reviewers
    pub async fn reviewers_of_paper(&self, requester_id: i64, paper_id: i64) -> Result<Vec<i64>> {
        self.verification
            .verify_can_view_assignments(requester_id, paper_id)
            .await?;

        let reviews = self.repo.reviews_for_paper(paper_id).await?;
        Ok(reviews.into_iter().map(|r| r.reviewer_id).collect())
    }

    /// Papers in a track assigned to the requester
    pub async fn assignments_of(
        &self,
        requester_id: i64,
        conference_id: i64,
        track_id: i64,
    ) -> Result<Vec<Paper>> {
        let assigned = self.repo.reviews_by_reviewer(requester_id).await?;
        let papers = self.repo.papers_in_track(conference_id, track_id).await?;

        let assigned_ids: Vec<i64> = assigned.into_iter().map(|r| r.paper_id).collect();
        Ok(papers
            .into_iter()
            .filter(|p| assigned_ids.contains(&p.id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selects_three_smallest_loads() {
        // Loads [5,2,2,9,0] over bidders [1,2,3,4,5]: the three lowest
        // loads are {0,2,2}, taken by index order.
        let bidders = [(1, 5), (2, 2), (3, 2), (4, 9), (5, 0)];
        assert_eq!(select_reviewers(&bidders, 3), vec![5, 2, 3]);
    }

    #[test]
    fn test_selection_ignores_input_permutation_of_loads() {
        // Same multiset of loads in a different arrangement still yields
        // exactly the three smallest.
        let bidders = [(4, 9), (5, 0), (2, 2), (1, 5), (3, 2)];
        let selected = select_reviewers(&bidders, 3);
        assert_eq!(selected.len(), 3);
        assert!(selected.contains(&5));
        assert!(selected.contains(&2));
        assert!(selected.contains(&3));
    }

    #[test]
    fn test_fewer_bidders_than_slots() {
        let bidders = [(7, 4), (8, 1)];
        assert_eq!(select_reviewers(&bidders, 3), vec![8, 7]);
    }

    #[test]
    fn test_tie_break_is_stable() {
        let bidders = [(10, 3), (11, 3), (12, 3), (13, 3)];
        assert_eq!(select_reviewers(&bidders, 3), vec![10, 11, 12]);
    }

    #[test]
    fn test_no_bidders_selects_nothing() {
        assert!(select_reviewers(&[], 3).is_empty());
    }
}

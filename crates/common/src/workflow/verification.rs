//! Verification engine
//!
//! Gathers the live inputs of every permission decision (roles from the
//! Users system, the submission's COI list, the current phases) and
//! delegates the decision itself to the pure predicates in
//! [`rules`](super::rules). Any missing external data surfaces as
//! `NotFound`; nothing is swallowed.

use crate::clients::{Role, Submission, SubmissionsPort, UsersPort};
use crate::db::Repository;
use crate::errors::Result;
use crate::workflow::phase::PhaseService;
use crate::workflow::rules;
use std::sync::Arc;

/// Per-action permission checks
#[derive(Clone)]
pub struct VerificationService {
    repo: Repository,
    users: Arc<dyn UsersPort>,
    submissions: Arc<dyn SubmissionsPort>,
    phases: PhaseService,
}

impl VerificationService {
    pub fn new(
        repo: Repository,
        users: Arc<dyn UsersPort>,
        submissions: Arc<dyn SubmissionsPort>,
        phases: PhaseService,
    ) -> Self {
        Self {
            repo,
            users,
            submissions,
            phases,
        }
    }

    /// Resolve a paper to its external submission (`SubmissionNotFound`
    /// when absent)
    pub async fn submission_of(&self, paper_id: i64) -> Result<Submission> {
        self.submissions.submission(paper_id).await
    }

    /// Whether a review row assigns this reviewer to this paper
    async fn is_assigned(&self, paper_id: i64, reviewer_id: i64) -> Result<bool> {
        Ok(self.repo.find_review(paper_id, reviewer_id).await?.is_some())
    }

    /// Bid: REVIEWER on the paper's track, track phase exactly `BIDDING`.
    /// Returns the submission so callers need not refetch it.
    pub async fn verify_can_bid(&self, requester_id: i64, paper_id: i64) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let roles = self.users.roles_of_user(requester_id).await?;
        let phase = self
            .phases
            .track_phase(submission.event_id, submission.track_id)
            .await?;

        rules::ensure_can_bid(&roles, &submission, phase)?;
        Ok(submission)
    }

    /// Manual assignment: phase `ASSIGNING`, CHAIR initiates, REVIEWER
    /// assignee without a conflict of interest
    pub async fn verify_can_assign(
        &self,
        requester_id: i64,
        paper_id: i64,
        assignee_id: i64,
    ) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let initiator_roles = self.users.roles_of_user(requester_id).await?;
        let assignee_roles = self.users.roles_of_user(assignee_id).await?;
        let phase = self
            .phases
            .track_phase(submission.event_id, submission.track_id)
            .await?;

        rules::ensure_can_assign(
            &initiator_roles,
            &assignee_roles,
            assignee_id,
            &submission,
            phase,
        )?;
        Ok(submission)
    }

    /// Review submission: the assigned reviewer, track `REVIEWING`, paper
    /// not yet finalized
    pub async fn verify_can_submit_review(
        &self,
        requester_id: i64,
        paper_id: i64,
    ) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let is_assigned = self.is_assigned(paper_id, requester_id).await?;
        let track_phase = self
            .phases
            .track_phase(submission.event_id, submission.track_id)
            .await?;
        let paper_phase = self.phases.paper_phase(paper_id).await?;

        rules::ensure_can_submit_review(is_assigned, track_phase, paper_phase)?;
        Ok(submission)
    }

    /// Review access: assigned reviewer or chair during `REVIEWING`/`FINAL`,
    /// authors only once `FINAL`
    pub async fn verify_can_access_review(
        &self,
        requester_id: i64,
        paper_id: i64,
        reviewer_id: i64,
    ) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let roles = self.users.roles_of_user(requester_id).await?;
        let is_assigned_reviewer =
            requester_id == reviewer_id && self.is_assigned(paper_id, requester_id).await?;
        let track_phase = self
            .phases
            .track_phase(submission.event_id, submission.track_id)
            .await?;

        rules::ensure_can_access_review(
            requester_id,
            &roles,
            &submission,
            is_assigned_reviewer,
            track_phase,
        )?;
        Ok(submission)
    }

    /// Discussion: assigned reviewer or track chair, paper `IN_DISCUSSION`
    pub async fn verify_can_discuss(&self, requester_id: i64, paper_id: i64) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let roles = self.users.roles_of_user(requester_id).await?;
        let is_assigned = self.is_assigned(paper_id, requester_id).await?;
        let paper_phase = self.phases.paper_phase(paper_id).await?;

        rules::ensure_can_discuss(&roles, &submission, is_assigned, paper_phase)?;
        Ok(submission)
    }

    /// Finalization: track chair, paper `IN_DISCUSSION`
    pub async fn verify_can_finalize(&self, requester_id: i64, paper_id: i64) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let roles = self.users.roles_of_user(requester_id).await?;
        let paper_phase = self.phases.paper_phase(paper_id).await?;

        rules::ensure_can_finalize(&roles, &submission, paper_phase)?;
        Ok(submission)
    }

    /// Chair check for track-level operations (deadline, analytics,
    /// assignment runs)
    pub async fn verify_is_chair(
        &self,
        requester_id: i64,
        conference_id: i64,
        track_id: i64,
    ) -> Result<()> {
        let roles = self.users.roles_of_user(requester_id).await?;
        rules::require_role(&roles, conference_id, track_id, Role::Chair)
    }

    /// Chair or assigned reviewer; used for reviewer listings
    pub async fn verify_can_view_assignments(
        &self,
        requester_id: i64,
        paper_id: i64,
    ) -> Result<Submission> {
        let submission = self.submissions.submission(paper_id).await?;
        let roles = self.users.roles_of_user(requester_id).await?;

        if rules::holds_role(&roles, submission.event_id, submission.track_id, Role::Chair)
            || self.is_assigned(paper_id, requester_id).await?
        {
            Ok(submission)
        } else {
            Err(crate::errors::AppError::Forbidden {
                message: "assignments are visible to track chairs and assigned reviewers"
                    .to_string(),
            })
        }
    }
}

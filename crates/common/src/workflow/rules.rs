//! Pure permission predicates
//!
//! Every predicate fails closed: role mismatch yields `Forbidden`, phase
//! mismatch yields a 409-class phase error, a declared conflict of interest
//! yields `ConflictOfInterest`. The [`verification`](super::verification)
//! service gathers live inputs and delegates here, which keeps the actual
//! decision logic testable without a database.

use crate::clients::{Role, Submission, TrackRole};
use crate::errors::{AppError, Result};
use crate::workflow::phase::{PaperPhase, TrackPhase};

/// Require a role on a specific track
pub fn require_role(
    roles: &[TrackRole],
    conference_id: i64,
    track_id: i64,
    role: Role,
) -> Result<()> {
    if roles.iter().any(|r| r.grants(conference_id, track_id, role)) {
        Ok(())
    } else {
        Err(AppError::Forbidden {
            message: format!(
                "requires {:?} role on conference {} track {}",
                role, conference_id, track_id
            ),
        })
    }
}

/// Whether any entry grants the role on the track
pub fn holds_role(roles: &[TrackRole], conference_id: i64, track_id: i64, role: Role) -> bool {
    roles.iter().any(|r| r.grants(conference_id, track_id, role))
}

/// Require the track to be in exactly one phase
pub fn require_track_phase(actual: TrackPhase, required: TrackPhase) -> Result<()> {
    if actual == required {
        Ok(())
    } else {
        Err(AppError::WrongTrackPhase {
            required: format!("{:?}", required),
            actual,
        })
    }
}

/// Require the paper to be in exactly one phase
pub fn require_paper_phase(actual: PaperPhase, required: PaperPhase) -> Result<()> {
    if actual == required {
        Ok(())
    } else {
        Err(AppError::WrongPaperPhase {
            required: format!("{:?}", required),
            actual,
        })
    }
}

/// Bidding: REVIEWER on the paper's track, track phase exactly `BIDDING`
pub fn ensure_can_bid(
    requester_roles: &[TrackRole],
    submission: &Submission,
    track_phase: TrackPhase,
) -> Result<()> {
    require_role(
        requester_roles,
        submission.event_id,
        submission.track_id,
        Role::Reviewer,
    )?;
    require_track_phase(track_phase, TrackPhase::Bidding)
}

/// Manual assignment: phase `ASSIGNING`, CHAIR initiates, REVIEWER assignee
/// with no conflict of interest with the paper
pub fn ensure_can_assign(
    initiator_roles: &[TrackRole],
    assignee_roles: &[TrackRole],
    assignee_id: i64,
    submission: &Submission,
    track_phase: TrackPhase,
) -> Result<()> {
    require_track_phase(track_phase, TrackPhase::Assigning)?;
    require_role(
        initiator_roles,
        submission.event_id,
        submission.track_id,
        Role::Chair,
    )?;
    require_role(
        assignee_roles,
        submission.event_id,
        submission.track_id,
        Role::Reviewer,
    )?;

    if submission.has_conflict_with(assignee_id) {
        return Err(AppError::ConflictOfInterest {
            reviewer_id: assignee_id,
            paper_id: submission.id,
        });
    }

    Ok(())
}

/// Review submission: the requester must hold the (paper, reviewer)
/// assignment, the track must be `REVIEWING`, and the paper must not have
/// been finalized already
pub fn ensure_can_submit_review(
    is_assigned: bool,
    track_phase: TrackPhase,
    paper_phase: PaperPhase,
) -> Result<()> {
    if !is_assigned {
        return Err(AppError::Forbidden {
            message: "only the assigned reviewer may submit this review".to_string(),
        });
    }
    require_track_phase(track_phase, TrackPhase::Reviewing)?;

    if paper_phase == PaperPhase::Reviewed {
        return Err(AppError::WrongPaperPhase {
            required: "IN_REVIEW or IN_DISCUSSION".to_string(),
            actual: paper_phase,
        });
    }

    Ok(())
}

/// Review access: the assigned reviewer or a track chair during
/// `REVIEWING`/`FINAL`; a paper author only once the track is `FINAL`
pub fn ensure_can_access_review(
    requester_id: i64,
    requester_roles: &[TrackRole],
    submission: &Submission,
    is_assigned_reviewer: bool,
    track_phase: TrackPhase,
) -> Result<()> {
    let is_chair = holds_role(
        requester_roles,
        submission.event_id,
        submission.track_id,
        Role::Chair,
    );

    if is_assigned_reviewer || is_chair {
        return match track_phase {
            TrackPhase::Reviewing | TrackPhase::Final => Ok(()),
            other => Err(AppError::WrongTrackPhase {
                required: "REVIEWING or FINAL".to_string(),
                actual: other,
            }),
        };
    }

    if submission.is_author(requester_id) {
        return require_track_phase(track_phase, TrackPhase::Final);
    }

    Err(AppError::Forbidden {
        message: "not a reviewer, chair, or author of this paper".to_string(),
    })
}

/// Discussion: an assigned reviewer or a track chair, paper phase
/// `IN_DISCUSSION`
pub fn ensure_can_discuss(
    requester_roles: &[TrackRole],
    submission: &Submission,
    is_assigned_reviewer: bool,
    paper_phase: PaperPhase,
) -> Result<()> {
    let is_chair = holds_role(
        requester_roles,
        submission.event_id,
        submission.track_id,
        Role::Chair,
    );

    if !is_assigned_reviewer && !is_chair {
        return Err(AppError::Forbidden {
            message: "discussion is limited to assigned reviewers and track chairs".to_string(),
        });
    }

    require_paper_phase(paper_phase, PaperPhase::InDiscussion)
}

/// Finalization: a track chair, paper phase `IN_DISCUSSION`
pub fn ensure_can_finalize(
    requester_roles: &[TrackRole],
    submission: &Submission,
    paper_phase: PaperPhase,
) -> Result<()> {
    require_role(
        requester_roles,
        submission.event_id,
        submission.track_id,
        Role::Chair,
    )?;
    require_paper_phase(paper_phase, PaperPhase::InDiscussion)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            id: 12,
            event_id: 1,
            track_id: 4,
            authors: vec![100],
            conflicts_of_interest: vec![300],
            title: "T".into(),
            abstract_text: String::new(),
            keywords: vec![],
            paper: None,
        }
    }

    fn role(conference_id: i64, track_id: i64, role: Role) -> TrackRole {
        TrackRole {
            conference_id,
            track_id,
            role,
        }
    }

    #[test]
    fn test_bid_requires_reviewer_role() {
        let err = ensure_can_bid(
            &[role(1, 4, Role::Author)],
            &submission(),
            TrackPhase::Bidding,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_bid_requires_bidding_phase() {
        let roles = [role(1, 4, Role::Reviewer)];
        assert!(ensure_can_bid(&roles, &submission(), TrackPhase::Bidding).is_ok());

        let err = ensure_can_bid(&roles, &submission(), TrackPhase::Assigning).unwrap_err();
        assert!(matches!(err, AppError::WrongTrackPhase { .. }));
    }

    #[test]
    fn test_reviewer_role_on_other_track_does_not_count() {
        let err = ensure_can_bid(
            &[role(1, 5, Role::Reviewer)],
            &submission(),
            TrackPhase::Bidding,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_assign_happy_path() {
        let chair = [role(1, 4, Role::Chair)];
        let reviewer = [role(1, 4, Role::Reviewer)];
        assert!(
            ensure_can_assign(&chair, &reviewer, 301, &submission(), TrackPhase::Assigning).is_ok()
        );
    }

    #[test]
    fn test_assign_coi_always_blocks() {
        // Reviewer 300 is on the COI list; no role combination lets them in.
        let chair = [role(1, 4, Role::Chair)];
        let conflicted = [role(1, 4, Role::Reviewer), role(1, 4, Role::Chair)];

        let err = ensure_can_assign(
            &chair,
            &conflicted,
            300,
            &submission(),
            TrackPhase::Assigning,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::ConflictOfInterest {
                reviewer_id: 300,
                paper_id: 12
            }
        ));
    }

    #[test]
    fn test_assign_wrong_phase_is_conflict() {
        let chair = [role(1, 4, Role::Chair)];
        let reviewer = [role(1, 4, Role::Reviewer)];
        let err = ensure_can_assign(&chair, &reviewer, 301, &submission(), TrackPhase::Reviewing)
            .unwrap_err();
        assert!(matches!(err, AppError::WrongTrackPhase { .. }));
    }

    #[test]
    fn test_submit_review_requires_assignment() {
        let err =
            ensure_can_submit_review(false, TrackPhase::Reviewing, PaperPhase::InReview).unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_submit_review_allows_revision_during_discussion() {
        assert!(ensure_can_submit_review(true, TrackPhase::Reviewing, PaperPhase::InReview).is_ok());
        assert!(
            ensure_can_submit_review(true, TrackPhase::Reviewing, PaperPhase::InDiscussion).is_ok()
        );

        let err = ensure_can_submit_review(true, TrackPhase::Reviewing, PaperPhase::Reviewed)
            .unwrap_err();
        assert!(matches!(err, AppError::WrongPaperPhase { .. }));
    }

    #[test]
    fn test_author_sees_review_only_when_final() {
        let sub = submission();
        // author id 100, no roles needed
        let err = ensure_can_access_review(100, &[role(1, 4, Role::Author)], &sub, false, TrackPhase::Reviewing)
            .unwrap_err();
        assert!(matches!(err, AppError::WrongTrackPhase { .. }));

        assert!(ensure_can_access_review(
            100,
            &[role(1, 4, Role::Author)],
            &sub,
            false,
            TrackPhase::Final
        )
        .is_ok());
    }

    #[test]
    fn test_chair_and_assigned_reviewer_see_review_while_reviewing() {
        let sub = submission();
        assert!(ensure_can_access_review(
            7,
            &[role(1, 4, Role::Chair)],
            &sub,
            false,
            TrackPhase::Reviewing
        )
        .is_ok());
        assert!(ensure_can_access_review(8, &[], &sub, true, TrackPhase::Reviewing).is_ok());
    }

    #[test]
    fn test_stranger_cannot_access_review() {
        let err = ensure_can_access_review(999, &[], &submission(), false, TrackPhase::Final)
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_discuss_gated_on_paper_phase() {
        let sub = submission();
        assert!(
            ensure_can_discuss(&[], &sub, true, PaperPhase::InDiscussion).is_ok()
        );

        let err = ensure_can_discuss(&[], &sub, true, PaperPhase::InReview).unwrap_err();
        assert!(matches!(err, AppError::WrongPaperPhase { .. }));
    }

    #[test]
    fn test_finalize_requires_chair_and_discussion() {
        let sub = submission();
        let chair = [role(1, 4, Role::Chair)];

        assert!(ensure_can_finalize(&chair, &sub, PaperPhase::InDiscussion).is_ok());

        let err = ensure_can_finalize(&[role(1, 4, Role::Reviewer)], &sub, PaperPhase::InDiscussion)
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden { .. }));

        let err = ensure_can_finalize(&chair, &sub, PaperPhase::Reviewed).unwrap_err();
        assert!(matches!(err, AppError::WrongPaperPhase { .. }));
    }
}

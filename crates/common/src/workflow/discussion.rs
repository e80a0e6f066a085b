//! Discussion and consensus engine
//!
//! Discussion comments are confidential, append-only notes on a review
//! thread. Finalization is a strict gate: every review must lean the same
//! way, or nothing is written. There is no majority-vote fallback.

use crate::clock::Clock;
use crate::db::models::{Comment, PaperStatus, Recommendation, Review};
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::workflow::verification::VerificationService;
use std::sync::Arc;

/// Classify a recommendation; `BORDERLINE` is neither leaning and therefore
/// blocks unanimity
fn is_accept_leaning(r: Recommendation) -> bool {
    matches!(r, Recommendation::StrongAccept | Recommendation::WeakAccept)
}

fn is_reject_leaning(r: Recommendation) -> bool {
    matches!(r, Recommendation::StrongReject | Recommendation::WeakReject)
}

/// The unanimous verdict of a non-empty set of recommendations, if any
pub fn consensus(recommendations: &[Recommendation]) -> Option<PaperStatus> {
    if recommendations.is_empty() {
        return None;
    }
    if recommendations.iter().all(|&r| is_accept_leaning(r)) {
        return Some(PaperStatus::Accepted);
    }
    if recommendations.iter().all(|&r| is_reject_leaning(r)) {
        return Some(PaperStatus::Rejected);
    }
    None
}

/// Discussion comments and finalization
#[derive(Clone)]
pub struct DiscussionService {
    repo: Repository,
    verification: VerificationService,
    clock: Arc<dyn Clock>,
}

impl DiscussionService {
    pub fn new(repo: Repository, verification: VerificationService, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            verification,
            clock,
        }
    }

    /// Append a confidential comment to a review thread
    pub async fn submit_comment(
        &self,
        requester_id: i64,
        paper_id: i64,
        reviewer_id: i64,
        body: String,
    ) -> Result<Comment> {
        self.verification
            .verify_can_discuss(requester_id, paper_id)
            .await?;

        self.repo
            .find_review(paper_id, reviewer_id)
            .await?
            .ok_or(AppError::ReviewNotFound {
                paper_id,
                reviewer_id,
            })?;

        self.repo
            .append_comment(paper_id, reviewer_id, requester_id, body, self.clock.now())
            .await
    }

    /// Comments of a review thread, in posting order
    pub async fn comments(
        &self,
        requester_id: i64,
        paper_id: i64,
        reviewer_id: i64,
    ) -> Result<Vec<Comment>> {
        self.verification
            .verify_can_discuss(requester_id, paper_id)
            .await?;

        self.repo
            .find_review(paper_id, reviewer_id)
            .await?
            .ok_or(AppError::ReviewNotFound {
                paper_id,
                reviewer_id,
            })?;

        self.repo.comments_for_review(paper_id, reviewer_id).await
    }

    /// Close the discussion of a paper.
    ///
    /// Requires unanimity: all reviews accept-leaning sets `ACCEPTED`, all
    /// reject-leaning sets `REJECTED`; anything else fails with 409 and
    /// leaves the paper untouched. An empty review list is a logic error
    /// (the paper should never have reached discussion).
    pub async fn finalize(&self, requester_id: i64, paper_id: i64) -> Result<PaperStatus> {
        self.verification
            .verify_can_finalize(requester_id, paper_id)
            .await?;

        let reviews = self.repo.reviews_for_paper(paper_id).await?;
        if reviews.is_empty() {
            return Err(AppError::NothingToFinalize { paper_id });
        }

        let recommendations: Vec<Recommendation> =
            reviews.iter().filter_map(Review::recommendation).collect();

        // A review without a parseable recommendation cannot agree with
        // anything; the count mismatch below blocks consensus.
        let verdict = if recommendations.len() == reviews.len() {
            consensus(&recommendations)
        } else {
            None
        };

        let status = verdict.ok_or(AppError::ReviewsNotUnanimous { paper_id })?;

        let paper = self.repo.set_paper_outcome(paper_id, status).await?;

        tracing::info!(
            paper_id,
            status = ?paper.paper_status(),
            "Paper finalized"
        );
        crate::metrics::record_finalization(status);

        Ok(paper.paper_status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Recommendation::*;

    #[test]
    fn test_unanimous_accept() {
        assert_eq!(
            consensus(&[StrongAccept, WeakAccept, StrongAccept]),
            Some(PaperStatus::Accepted)
        );
    }

    #[test]
    fn test_unanimous_reject() {
        assert_eq!(
            consensus(&[WeakReject, WeakReject, WeakReject]),
            Some(PaperStatus::Rejected)
        );
    }

    #[test]
    fn test_mixed_reviews_block_consensus() {
        assert_eq!(consensus(&[StrongAccept, StrongReject, WeakAccept]), None);
        assert_eq!(consensus(&[WeakAccept, WeakReject]), None);
    }

    #[test]
    fn test_borderline_blocks_consensus() {
        assert_eq!(consensus(&[StrongAccept, Borderline, StrongAccept]), None);
        assert_eq!(consensus(&[Borderline]), None);
    }

    #[test]
    fn test_empty_reviews_have_no_consensus() {
        assert_eq!(consensus(&[]), None);
    }

    #[test]
    fn test_single_review_is_unanimous() {
        assert_eq!(consensus(&[StrongAccept]), Some(PaperStatus::Accepted));
        assert_eq!(consensus(&[StrongReject]), Some(PaperStatus::Rejected));
    }

    mod finalize {
        use super::super::*;
        use crate::clients::{
            ExternalTrack, Role, Submission, SubmissionsPort, TrackRole, UsersPort,
        };
        use crate::clock::FixedClock;
        use crate::db::models::{Paper, Track};
        use crate::db::DbPool;
        use crate::workflow::phase::PhaseService;
        use async_trait::async_trait;
        use chrono::{TimeZone, Utc};
        use sea_orm::{DatabaseBackend, MockDatabase};

        const CONFERENCE: i64 = 1;
        const TRACK: i64 = 4;
        const PAPER: i64 = 12;
        const CHAIR: i64 = 7;

        struct FakeUsers;

        #[async_trait]
        impl UsersPort for FakeUsers {
            async fn roles_of_user(&self, _user_id: i64) -> crate::errors::Result<Vec<TrackRole>> {
                Ok(vec![TrackRole {
                    conference_id: CONFERENCE,
                    track_id: TRACK,
                    role: Role::Chair,
                }])
            }

            async fn track(
                &self,
                _conference_id: i64,
                _track_id: i64,
            ) -> crate::errors::Result<ExternalTrack> {
                Ok(ExternalTrack {
                    submission_deadline: Utc.timestamp_opt(1_000, 0).unwrap(),
                })
            }
        }

        struct FakeSubmissions;

        #[async_trait]
        impl SubmissionsPort for FakeSubmissions {
            async fn submission(&self, paper_id: i64) -> crate::errors::Result<Submission> {
                Ok(Submission {
                    id: paper_id,
                    event_id: CONFERENCE,
                    track_id: TRACK,
                    authors: vec![100],
                    conflicts_of_interest: vec![],
                    title: "T".into(),
                    abstract_text: String::new(),
                    keywords: vec![],
                    paper: None,
                })
            }

            async fn submissions_in_track(
                &self,
                _conference_id: i64,
                _track_id: i64,
                _requester_id: i64,
            ) -> crate::errors::Result<Vec<Submission>> {
                Ok(vec![])
            }
        }

        fn review(reviewer_id: i64, recommendation: Recommendation) -> Review {
            Review {
                paper_id: PAPER,
                reviewer_id,
                confidence: Some(3),
                recommendation: Some(recommendation.as_str().to_string()),
                comment_for_authors: None,
            }
        }

        fn service(db: sea_orm::DatabaseConnection) -> DiscussionService {
            let pool = DbPool {
                primary: db,
                replica: None,
            };
            let repo = Repository::new(pool);
            let users: Arc<dyn UsersPort> = Arc::new(FakeUsers);
            let submissions: Arc<dyn SubmissionsPort> = Arc::new(FakeSubmissions);
            let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc.timestamp_opt(5_000, 0).unwrap()));

            let phases = PhaseService::new(
                repo.clone(),
                users.clone(),
                submissions.clone(),
                clock.clone(),
            );
            let verification = VerificationService::new(repo.clone(), users, submissions, phases);

            DiscussionService::new(repo, verification, clock)
        }

        #[tokio::test]
        async fn test_split_reviews_leave_paper_untouched() {
            let track = Track {
                conference_id: CONFERENCE,
                track_id: TRACK,
                bidding_deadline: Some(Utc.timestamp_opt(2_000, 0).unwrap().into()),
                reviewers_finalized: true,
            };
            let paper = Paper {
                id: PAPER,
                conference_id: CONFERENCE,
                track_id: TRACK,
                status: String::from(PaperStatus::NotDecided),
                reviews_finalized: false,
            };
            let reviews = vec![
                review(21, Recommendation::StrongAccept),
                review(22, Recommendation::StrongReject),
            ];

            // Only SELECT results are seeded. Any UPDATE the service tried
            // to issue would fail the mock with a database error instead of
            // the consensus error asserted below.
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![track]])
                .append_query_results([vec![paper]])
                .append_query_results([reviews.clone(), reviews])
                .into_connection();

            let err = service(db).finalize(CHAIR, PAPER).await.unwrap_err();

            assert!(matches!(
                err,
                AppError::ReviewsNotUnanimous { paper_id: PAPER }
            ));
        }
    }
}

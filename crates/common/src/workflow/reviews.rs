//! Review submission and access

use crate::db::models::{Recommendation, Review};
use crate::db::Repository;
use crate::errors::{AppError, Result};
use crate::workflow::verification::VerificationService;

#[derive(Clone)]
pub struct ReviewService {
    repo: Repository,
    verification: VerificationService,
}

impl ReviewService {
    pub fn new(repo: Repository, verification: VerificationService) -> Self {
        Self { repo, verification }
    }

    /// Fill in the requester's assigned review.
    ///
    /// The empty row created at assignment time must exist; submission turns
    /// it non-empty. Resubmission while the paper is under discussion
    /// overwrites the earlier content.
    pub async fn submit(
        &self,
        requester_id: i64,
        paper_id: i64,
        confidence: i16,
        recommendation: Recommendation,
        comment_for_authors: Option<String>,
    ) -> Result<Review> {
        self.verification
            .verify_can_submit_review(requester_id, paper_id)
            .await?;

        let review = self
            .repo
            .submit_review(paper_id, requester_id, confidence, recommendation, comment_for_authors)
            .await?;

        tracing::info!(
            paper_id,
            reviewer_id = requester_id,
            recommendation = ?recommendation,
            "Review submitted"
        );

        Ok(review)
    }

    /// Read a review, subject to the access rules (assigned reviewer or
    /// chair during `REVIEWING`/`FINAL`, authors once `FINAL`)
    pub async fn get(
        &self,
        requester_id: i64,
        paper_id: i64,
        reviewer_id: i64,
    ) -> Result<Review> {
        self.verification
            .verify_can_access_review(requester_id, paper_id, reviewer_id)
            .await?;

        self.repo
            .find_review(paper_id, reviewer_id)
            .await?
            .ok_or(AppError::ReviewNotFound {
                paper_id,
                reviewer_id,
            })
    }
}

//! Review handlers

use crate::requester::Requester;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use reviewflow_common::db::models::{Recommendation, Review};
use reviewflow_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitReviewRequest {
    /// Reviewer's confidence in their own judgment, 1 (none) to 5 (expert)
    #[validate(range(min = 1, max = 5))]
    pub confidence: i16,

    pub recommendation: Recommendation,

    #[validate(length(max = 50000))]
    pub comment_for_authors: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub paper_id: i64,
    pub reviewer_id: i64,
    pub submitted: bool,
    pub confidence: Option<i16>,
    pub recommendation: Option<Recommendation>,
    pub comment_for_authors: Option<String>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        let recommendation = review.recommendation();
        Self {
            paper_id: review.paper_id,
            reviewer_id: review.reviewer_id,
            submitted: review.is_submitted(),
            confidence: review.confidence,
            recommendation,
            comment_for_authors: review.comment_for_authors,
        }
    }
}

/// PUT /v1/papers/{paper_id}/review
///
/// Fill in the requester's assigned review; resubmission overwrites.
pub async fn submit_review(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(paper_id): Path<i64>,
    Json(request): Json<SubmitReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
    })?;

    let review = state
        .reviews
        .submit(
            requester_id,
            paper_id,
            request.confidence,
            request.recommendation,
            request.comment_for_authors,
        )
        .await?;

    Ok(Json(review.into()))
}

/// GET /v1/papers/{paper_id}/reviews/{reviewer_id}
///
/// Read one review, subject to the access rules.
pub async fn get_review(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((paper_id, reviewer_id)): Path<(i64, i64)>,
) -> Result<Json<ReviewResponse>> {
    let review = state.reviews.get(requester_id, paper_id, reviewer_id).await?;

    Ok(Json(review.into()))
}

//! Discussion and finalization handlers

use crate::requester::Requester;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use reviewflow_common::db::models::{Comment, PaperStatus};
use reviewflow_common::errors::{AppError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub author_id: i64,
    pub body: String,
    pub posted_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author_id: comment.author_id,
            body: comment.body,
            posted_at: comment.posted_at.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FinalizationResponse {
    pub paper_id: i64,
    pub status: PaperStatus,
}

/// POST /v1/papers/{paper_id}/reviews/{reviewer_id}/comments
///
/// Append a confidential comment to a review thread.
pub async fn submit_comment(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((paper_id, reviewer_id)): Path<(i64, i64)>,
    Json(request): Json<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    request.validate().map_err(|e| AppError::Validation {
        message: e.to_string(),
    })?;

    let comment = state
        .discussion
        .submit_comment(requester_id, paper_id, reviewer_id, request.body)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}

/// GET /v1/papers/{paper_id}/reviews/{reviewer_id}/comments
///
/// Comments of a review thread, in posting order.
pub async fn list_comments(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((paper_id, reviewer_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<CommentResponse>>> {
    let comments = state
        .discussion
        .comments(requester_id, paper_id, reviewer_id)
        .await?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// POST /v1/papers/{paper_id}/finalization
///
/// Close the discussion; requires unanimous reviews.
pub async fn finalize(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(paper_id): Path<i64>,
) -> Result<Json<FinalizationResponse>> {
    let status = state.discussion.finalize(requester_id, paper_id).await?;

    Ok(Json(FinalizationResponse { paper_id, status }))
}

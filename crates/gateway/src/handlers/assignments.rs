//! Assignment handlers

use crate::requester::Requester;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use reviewflow_common::db::models::{Paper, PaperStatus};
use reviewflow_common::errors::Result;
use reviewflow_common::workflow::assignment::PaperAssignment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub reviewer_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ReviewersResponse {
    pub paper_id: i64,
    pub reviewer_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct AssignedPaperResponse {
    pub paper_id: i64,
    pub status: PaperStatus,
}

impl From<Paper> for AssignedPaperResponse {
    fn from(paper: Paper) -> Self {
        Self {
            paper_id: paper.id,
            status: paper.paper_status(),
        }
    }
}

/// POST /v1/papers/{paper_id}/assignments
///
/// Chair assigns one reviewer to one paper.
pub async fn assign_manually(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(paper_id): Path<i64>,
    Json(request): Json<AssignRequest>,
) -> Result<StatusCode> {
    state
        .assignments
        .assign_manually(requester_id, paper_id, request.reviewer_id)
        .await?;

    Ok(StatusCode::CREATED)
}

/// POST /v1/tracks/{conference_id}/{track_id}/assignments/auto
///
/// Chair assigns reviewers to every paper of the track from the bids.
pub async fn assign_automatically(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((conference_id, track_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<PaperAssignment>>> {
    let assignments = state
        .assignments
        .assign_automatically(requester_id, conference_id, track_id)
        .await?;

    Ok(Json(assignments))
}

/// POST /v1/tracks/{conference_id}/{track_id}/assignments/finalize
///
/// Chair marks reviewer assignment complete, moving the track to REVIEWING.
pub async fn finalize_assignments(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((conference_id, track_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    state
        .assignments
        .finalize_assignments(requester_id, conference_id, track_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/papers/{paper_id}/reviewers
///
/// Reviewers assigned to a paper; chairs and assigned reviewers.
pub async fn list_reviewers(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(paper_id): Path<i64>,
) -> Result<Json<ReviewersResponse>> {
    let reviewer_ids = state
        .assignments
        .reviewers_of_paper(requester_id, paper_id)
        .await?;

    Ok(Json(ReviewersResponse {
        paper_id,
        reviewer_ids,
    }))
}

/// GET /v1/tracks/{conference_id}/{track_id}/assignments
///
/// Papers in the track assigned to the requester.
pub async fn my_assignments(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((conference_id, track_id)): Path<(i64, i64)>,
) -> Result<Json<Vec<AssignedPaperResponse>>> {
    let papers = state
        .assignments
        .assignments_of(requester_id, conference_id, track_id)
        .await?;

    Ok(Json(papers.into_iter().map(Into::into).collect()))
}

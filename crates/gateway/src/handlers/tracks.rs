//! Track administration handlers

use crate::requester::Requester;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use reviewflow_common::errors::Result;
use reviewflow_common::workflow::tracks::TrackAnalytics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SetDeadlineRequest {
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DeadlineResponse {
    pub conference_id: i64,
    pub track_id: i64,
    pub deadline: DateTime<Utc>,
}

/// PUT /v1/tracks/{conference_id}/{track_id}/bidding-deadline
///
/// Chair sets the bidding deadline.
pub async fn set_bidding_deadline(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((conference_id, track_id)): Path<(i64, i64)>,
    Json(request): Json<SetDeadlineRequest>,
) -> Result<StatusCode> {
    state
        .tracks
        .set_bidding_deadline(requester_id, conference_id, track_id, request.deadline)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/tracks/{conference_id}/{track_id}/bidding-deadline
///
/// The effective bidding deadline; materializes the default when unset.
pub async fn get_bidding_deadline(
    State(state): State<AppState>,
    Path((conference_id, track_id)): Path<(i64, i64)>,
) -> Result<Json<DeadlineResponse>> {
    let deadline = state.tracks.bidding_deadline(conference_id, track_id).await?;

    Ok(Json(DeadlineResponse {
        conference_id,
        track_id,
        deadline,
    }))
}

/// GET /v1/tracks/{conference_id}/{track_id}/analytics
///
/// Outcome counts of the track's papers; chairs only.
pub async fn analytics(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path((conference_id, track_id)): Path<(i64, i64)>,
) -> Result<Json<TrackAnalytics>> {
    let analytics = state
        .tracks
        .analytics(requester_id, conference_id, track_id)
        .await?;

    Ok(Json(analytics))
}

//! Phase query handlers
//!
//! Phases are derived on every request; these endpoints expose the derived
//! value and never write anything.

use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use reviewflow_common::errors::Result;
use reviewflow_common::workflow::{PaperPhase, TrackPhase};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TrackPhaseResponse {
    pub conference_id: i64,
    pub track_id: i64,
    pub phase: TrackPhase,
}

#[derive(Debug, Serialize)]
pub struct PaperPhaseResponse {
    pub paper_id: i64,
    pub phase: PaperPhase,
}

/// GET /v1/tracks/{conference_id}/{track_id}/phase
pub async fn track_phase(
    State(state): State<AppState>,
    Path((conference_id, track_id)): Path<(i64, i64)>,
) -> Result<Json<TrackPhaseResponse>> {
    let phase = state.phases.track_phase(conference_id, track_id).await?;

    Ok(Json(TrackPhaseResponse {
        conference_id,
        track_id,
        phase,
    }))
}

/// GET /v1/papers/{paper_id}/phase
pub async fn paper_phase(
    State(state): State<AppState>,
    Path(paper_id): Path<i64>,
) -> Result<Json<PaperPhaseResponse>> {
    let phase = state.phases.paper_phase(paper_id).await?;

    Ok(Json(PaperPhaseResponse { paper_id, phase }))
}

//! Bidding handlers

use crate::requester::Requester;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use reviewflow_common::db::models::{Bid, BidPreference};
use reviewflow_common::errors::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    pub preference: BidPreference,
}

#[derive(Debug, Serialize)]
pub struct BidResponse {
    pub paper_id: i64,
    pub bidder_id: i64,
    pub preference: BidPreference,
}

impl From<Bid> for BidResponse {
    fn from(bid: Bid) -> Self {
        Self {
            paper_id: bid.paper_id,
            bidder_id: bid.bidder_id,
            preference: bid.bid_preference(),
        }
    }
}

/// PUT /v1/papers/{paper_id}/bid
///
/// Record or overwrite the requester's preference for a paper.
pub async fn place_bid(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(paper_id): Path<i64>,
    Json(request): Json<PlaceBidRequest>,
) -> Result<Json<BidResponse>> {
    let bid = state
        .bids
        .place_bid(requester_id, paper_id, request.preference)
        .await?;

    Ok(Json(bid.into()))
}

/// GET /v1/papers/{paper_id}/bids
///
/// All bids on a paper; chairs only.
pub async fn list_bids(
    State(state): State<AppState>,
    Requester(requester_id): Requester,
    Path(paper_id): Path<i64>,
) -> Result<Json<Vec<BidResponse>>> {
    let bids = state.bids.bids_for_paper(requester_id, paper_id).await?;

    Ok(Json(bids.into_iter().map(Into::into).collect()))
}

//! Bid intake
//!
//! Reviewers state their preference per paper while the track is in
//! `BIDDING`; a later bid by the same reviewer overwrites the earlier one.

use crate::db::models::{Bid, BidPreference};
use crate::db::Repository;
use crate::errors::Result;
use crate::workflow::verification::VerificationService;

#[derive(Clone)]
pub struct BidService {
    repo: Repository,
    verification: VerificationService,
}

impl BidService {
    pub fn new(repo: Repository, verification: VerificationService) -> Self {
        Self { repo, verification }
    }

    /// Record the requester's preference for a paper
    pub async fn place_bid(
        &self,
        requester_id: i64,
        paper_id: i64,
        preference: BidPreference,
    ) -> Result<Bid> {
        self.verification
            .verify_can_bid(requester_id, paper_id)
            .await?;

        let bid = self.repo.upsert_bid(paper_id, requester_id, preference).await?;

        tracing::info!(
            paper_id,
            bidder_id = requester_id,
            preference = ?preference,
            "Bid recorded"
        );
        crate::metrics::record_bid(&String::from(preference));

        Ok(bid)
    }

    /// All bids on a paper; chairs only
    pub async fn bids_for_paper(&self, requester_id: i64, paper_id: i64) -> Result<Vec<Bid>> {
        let submission = self.verification.submission_of(paper_id).await?;
        self.verification
            .verify_is_chair(requester_id, submission.event_id, submission.track_id)
            .await?;

        self.repo.bids_for_paper(paper_id).await
    }
}

//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations
//! with proper error handling.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get the read connection
    fn read_conn(&self) -> &DatabaseConnection {
        self.pool.read()
    }

    /// Get the write connection
    fn write_conn(&self) -> &DatabaseConnection {
        self.pool.write()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Track Operations
    // ========================================================================

    /// Find a track by its composite key
    pub async fn find_track(&self, conference_id: i64, track_id: i64) -> Result<Option<Track>> {
        TrackEntity::find_by_id((conference_id, track_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find a track, creating the local mirror row on first access
    pub async fn ensure_track(&self, conference_id: i64, track_id: i64) -> Result<Track> {
        if let Some(track) = self.find_track(conference_id, track_id).await? {
            return Ok(track);
        }

        let track = TrackActiveModel {
            conference_id: Set(conference_id),
            track_id: Set(track_id),
            bidding_deadline: Set(None),
            reviewers_finalized: Set(false),
        };

        tracing::debug!(conference_id, track_id, "Caching track locally");
        track.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Persist the bidding deadline of a track
    pub async fn set_bidding_deadline(
        &self,
        conference_id: i64,
        track_id: i64,
        deadline: DateTime<Utc>,
    ) -> Result<Track> {
        let mut track: TrackActiveModel =
            self.ensure_track(conference_id, track_id).await?.into();

        track.bidding_deadline = Set(Some(deadline.into()));
        track.update(self.write_conn()).await.map_err(Into::into)
    }

    /// Mark reviewer assignment as complete for a track
    pub async fn set_reviewers_finalized(
        &self,
        conference_id: i64,
        track_id: i64,
    ) -> Result<Track> {
        let mut track: TrackActiveModel =
            self.ensure_track(conference_id, track_id).await?.into();

        track.reviewers_finalized = Set(true);
        track.update(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Paper Operations
    // ========================================================================

    /// Find paper by ID
    pub async fn find_paper(&self, id: i64) -> Result<Option<Paper>> {
        PaperEntity::find_by_id(id)
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Find a paper, creating its local row on first assignment
    pub async fn ensure_paper(
        &self,
        id: i64,
        conference_id: i64,
        track_id: i64,
    ) -> Result<Paper> {
        if let Some(paper) = self.find_paper(id).await? {
            return Ok(paper);
        }

        let paper = PaperActiveModel {
            id: Set(id),
            conference_id: Set(conference_id),
            track_id: Set(track_id),
            status: Set(String::from(PaperStatus::NotDecided)),
            reviews_finalized: Set(false),
        };

        paper.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// List the locally known papers of a track
    pub async fn papers_in_track(&self, conference_id: i64, track_id: i64) -> Result<Vec<Paper>> {
        PaperEntity::find()
            .filter(PaperColumn::ConferenceId.eq(conference_id))
            .filter(PaperColumn::TrackId.eq(track_id))
            .order_by_asc(PaperColumn::Id)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Write the final outcome of a paper and close its review cycle
    pub async fn set_paper_outcome(&self, paper_id: i64, status: PaperStatus) -> Result<Paper> {
        let mut paper: PaperActiveModel = self
            .find_paper(paper_id)
            .await?
            .ok_or(AppError::PaperNotFound { id: paper_id })?
            .into();

        paper.status = Set(String::from(status));
        paper.reviews_finalized = Set(true);
        paper.update(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Review Operations
    // ========================================================================

    /// Find a review by its composite key
    pub async fn find_review(&self, paper_id: i64, reviewer_id: i64) -> Result<Option<Review>> {
        ReviewEntity::find_by_id((paper_id, reviewer_id))
            .one(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All reviews of a paper
    pub async fn reviews_for_paper(&self, paper_id: i64) -> Result<Vec<Review>> {
        ReviewEntity::find()
            .filter(ReviewColumn::PaperId.eq(paper_id))
            .order_by_asc(ReviewColumn::ReviewerId)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// All reviews assigned to a reviewer, across every track
    pub async fn reviews_by_reviewer(&self, reviewer_id: i64) -> Result<Vec<Review>> {
        ReviewEntity::find()
            .filter(ReviewColumn::ReviewerId.eq(reviewer_id))
            .order_by_asc(ReviewColumn::PaperId)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Current review load of a reviewer: assigned reviews across the whole
    /// system, not just one track
    pub async fn reviewer_load(&self, reviewer_id: i64) -> Result<u64> {
        ReviewEntity::find()
            .filter(ReviewColumn::ReviewerId.eq(reviewer_id))
            .count(self.read_conn())
            .await
            .map_err(Into::into)
    }

    /// Create the empty review row that represents an assignment.
    /// Idempotent: an existing row is returned untouched.
    pub async fn create_empty_review(&self, paper_id: i64, reviewer_id: i64) -> Result<Review> {
        if let Some(existing) = self.find_review(paper_id, reviewer_id).await? {
            return Ok(existing);
        }

        let review = ReviewActiveModel {
            paper_id: Set(paper_id),
            reviewer_id: Set(reviewer_id),
            confidence: Set(None),
            recommendation: Set(None),
            comment_for_authors: Set(None),
        };

        review.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Fill in an assigned review
    pub async fn submit_review(
        &self,
        paper_id: i64,
        reviewer_id: i64,
        confidence: i16,
        recommendation: Recommendation,
        comment_for_authors: Option<String>,
    ) -> Result<Review> {
        let mut review: ReviewActiveModel = self
            .find_review(paper_id, reviewer_id)
            .await?
            .ok_or(AppError::ReviewNotFound {
                paper_id,
                reviewer_id,
            })?
            .into();

        review.confidence = Set(Some(confidence));
        review.recommendation = Set(Some(String::from(recommendation)));
        review.comment_for_authors = Set(comment_for_authors);
        review.update(self.write_conn()).await.map_err(Into::into)
    }

    // ========================================================================
    // Bid Operations
    // ========================================================================

    /// Record a bid, overwriting any earlier bid of the same reviewer
    pub async fn upsert_bid(
        &self,
        paper_id: i64,
        bidder_id: i64,
        preference: BidPreference,
    ) -> Result<Bid> {
        if let Some(existing) = BidEntity::find_by_id((paper_id, bidder_id))
            .one(self.write_conn())
            .await?
        {
            let mut bid: BidActiveModel = existing.into();
            bid.preference = Set(String::from(preference));
            return bid.update(self.write_conn()).await.map_err(Into::into);
        }

        let bid = BidActiveModel {
            paper_id: Set(paper_id),
            bidder_id: Set(bidder_id),
            preference: Set(String::from(preference)),
        };

        bid.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// All bids on a paper, in stable bidder order
    pub async fn bids_for_paper(&self, paper_id: i64) -> Result<Vec<Bid>> {
        BidEntity::find()
            .filter(BidColumn::PaperId.eq(paper_id))
            .order_by_asc(BidColumn::BidderId)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Discussion Comment Operations
    // ========================================================================

    /// Append a comment to a review thread
    pub async fn append_comment(
        &self,
        paper_id: i64,
        reviewer_id: i64,
        author_id: i64,
        body: String,
        posted_at: DateTime<Utc>,
    ) -> Result<Comment> {
        let comment = CommentActiveModel {
            id: Set(Uuid::new_v4()),
            paper_id: Set(paper_id),
            reviewer_id: Set(reviewer_id),
            author_id: Set(author_id),
            body: Set(body),
            posted_at: Set(posted_at.into()),
        };

        comment.insert(self.write_conn()).await.map_err(Into::into)
    }

    /// Comments of a review thread in posting order
    pub async fn comments_for_review(
        &self,
        paper_id: i64,
        reviewer_id: i64,
    ) -> Result<Vec<Comment>> {
        CommentEntity::find()
            .filter(CommentColumn::PaperId.eq(paper_id))
            .filter(CommentColumn::ReviewerId.eq(reviewer_id))
            .order_by_asc(CommentColumn::PostedAt)
            .all(self.read_conn())
            .await
            .map_err(Into::into)
    }
}

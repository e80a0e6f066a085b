//! SeaORM entity models
//!
//! Database entities for ReviewFlow: tracks, papers, reviews, bids, and
//! discussion comments. Track and paper phase are never stored; both are
//! recomputed from deadlines and the flags kept here.

mod bid;
mod comment;
mod paper;
mod review;
mod track;

pub use track::{
    Entity as TrackEntity,
    Model as Track,
    ActiveModel as TrackActiveModel,
};

pub use paper::{
    Entity as PaperEntity,
    Model as Paper,
    ActiveModel as PaperActiveModel,
    Column as PaperColumn,
    PaperStatus,
};

pub use review::{
    Entity as ReviewEntity,
    Model as Review,
    ActiveModel as ReviewActiveModel,
    Column as ReviewColumn,
    Recommendation,
};

pub use bid::{
    Entity as BidEntity,
    Model as Bid,
    ActiveModel as BidActiveModel,
    Column as BidColumn,
    BidPreference,
};

pub use comment::{
    Entity as CommentEntity,
    Model as Comment,
    ActiveModel as CommentActiveModel,
    Column as CommentColumn,
};

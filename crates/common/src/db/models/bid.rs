//! Bid entity
//!
//! One bid per reviewer per paper, overwritten on resubmission.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reviewer preference for a paper
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidPreference {
    CanReview,
    Neutral,
    NotReview,
}

impl From<String> for BidPreference {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CAN_REVIEW" => BidPreference::CanReview,
            "NOT_REVIEW" => BidPreference::NotReview,
            _ => BidPreference::Neutral,
        }
    }
}

impl From<BidPreference> for String {
    fn from(p: BidPreference) -> Self {
        match p {
            BidPreference::CanReview => "CAN_REVIEW".to_string(),
            BidPreference::Neutral => "NEUTRAL".to_string(),
            BidPreference::NotReview => "NOT_REVIEW".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub paper_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub bidder_id: i64,

    #[sea_orm(column_type = "Text")]
    pub preference: String,
}

impl Model {
    /// Get the preference as an enum
    pub fn bid_preference(&self) -> BidPreference {
        BidPreference::from(self.preference.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::paper::Entity",
        from = "Column::PaperId",
        to = "super::paper::Column::Id"
    )]
    Paper,
}

impl Related<super::paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paper.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_roundtrip() {
        for p in [BidPreference::CanReview, BidPreference::Neutral, BidPreference::NotReview] {
            let s: String = p.into();
            assert_eq!(BidPreference::from(s), p);
        }
    }
}

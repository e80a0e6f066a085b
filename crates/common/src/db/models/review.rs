//! Review entity
//!
//! One row per (paper, reviewer), created empty at assignment time. A review
//! with no confidence score has not been submitted yet; row existence is
//! distinct from submission.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Five-point recommendation scale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongAccept,
    WeakAccept,
    Borderline,
    WeakReject,
    StrongReject,
}

impl Recommendation {
    /// Parse the stored string form; `None` for anything unrecognized
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STRONG_ACCEPT" => Some(Recommendation::StrongAccept),
            "WEAK_ACCEPT" => Some(Recommendation::WeakAccept),
            "BORDERLINE" => Some(Recommendation::Borderline),
            "WEAK_REJECT" => Some(Recommendation::WeakReject),
            "STRONG_REJECT" => Some(Recommendation::StrongReject),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongAccept => "STRONG_ACCEPT",
            Recommendation::WeakAccept => "WEAK_ACCEPT",
            Recommendation::Borderline => "BORDERLINE",
            Recommendation::WeakReject => "WEAK_REJECT",
            Recommendation::StrongReject => "STRONG_REJECT",
        }
    }
}

impl From<Recommendation> for String {
    fn from(r: Recommendation) -> Self {
        r.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub paper_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub reviewer_id: i64,

    /// 1 (none) to 5 (expert); null until the review is submitted
    pub confidence: Option<i16>,

    #[sea_orm(column_type = "Text", nullable)]
    pub recommendation: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub comment_for_authors: Option<String>,
}

impl Model {
    /// A review counts as submitted once it carries a confidence score
    pub fn is_submitted(&self) -> bool {
        self.confidence.is_some()
    }

    /// Get the recommendation as an enum, if submitted and well-formed
    pub fn recommendation(&self) -> Option<Recommendation> {
        self.recommendation.as_deref().and_then(Recommendation::parse)
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

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Paper.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_roundtrip() {
        for r in [
            Recommendation::StrongAccept,
            Recommendation::WeakAccept,
            Recommendation::Borderline,
            Recommendation::WeakReject,
            Recommendation::StrongReject,
        ] {
            assert_eq!(Recommendation::parse(r.as_str()), Some(r));
        }
        assert_eq!(Recommendation::parse("MAYBE"), None);
    }

    #[test]
    fn test_empty_review_is_not_submitted() {
        let review = Model {
            paper_id: 1,
            reviewer_id: 2,
            confidence: None,
            recommendation: None,
            comment_for_authors: None,
        };
        assert!(!review.is_submitted());
        assert_eq!(review.recommendation(), None);
    }
}

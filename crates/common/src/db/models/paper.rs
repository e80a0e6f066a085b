//! Paper entity
//!
//! Mirrors an external submission; created locally when a reviewer is first
//! assigned. The status is write-once per finalization cycle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Final outcome of a paper
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaperStatus {
    NotDecided,
    Accepted,
    Rejected,
}

impl From<String> for PaperStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACCEPTED" => PaperStatus::Accepted,
            "REJECTED" => PaperStatus::Rejected,
            _ => PaperStatus::NotDecided,
        }
    }
}

impl From<PaperStatus> for String {
    fn from(status: PaperStatus) -> Self {
        match status {
            PaperStatus::NotDecided => "NOT_DECIDED".to_string(),
            PaperStatus::Accepted => "ACCEPTED".to_string(),
            PaperStatus::Rejected => "REJECTED".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "papers")]
pub struct Model {
    /// External submission id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub conference_id: i64,

    pub track_id: i64,

    #[sea_orm(column_type = "Text")]
    pub status: String,

    /// True once discussion reached consensus and the outcome was written
    pub reviews_finalized: bool,
}

impl Model {
    /// Get the outcome as an enum
    pub fn paper_status(&self) -> PaperStatus {
        PaperStatus::from(self.status.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::track::Entity",
        from = "(Column::ConferenceId, Column::TrackId)",
        to = "(super::track::Column::ConferenceId, super::track::Column::TrackId)"
    )]
    Track,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,

    #[sea_orm(has_many = "super::bid::Entity")]
    Bids,
}

impl Related<super::track::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Track.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [PaperStatus::NotDecided, PaperStatus::Accepted, PaperStatus::Rejected] {
            let s: String = status.into();
            assert_eq!(PaperStatus::from(s), status);
        }
    }

    #[test]
    fn test_unknown_status_defaults_to_not_decided() {
        assert_eq!(PaperStatus::from("garbage".to_string()), PaperStatus::NotDecided);
    }
}

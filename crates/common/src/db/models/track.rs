//! Track entity
//!
//! Mirrors a track of the external Users system, created lazily on first
//! access. Only the bidding deadline and the assignment-complete flag are
//! owned locally; the submission deadline stays external.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub conference_id: i64,

    #[sea_orm(primary_key, auto_increment = false)]
    pub track_id: i64,

    /// Unset until a chair sets it or the +2-day default is materialized
    pub bidding_deadline: Option<DateTimeWithTimeZone>,

    /// True once a chair has finalized reviewer assignment
    pub reviewers_finalized: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::paper::Entity")]
    Papers,
}

impl Related<super::paper::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Papers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

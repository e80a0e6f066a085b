//! Discussion comment entity
//!
//! Confidential comments attached to a review thread. Append-only; never
//! edited or deleted once posted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub paper_id: i64,

    pub reviewer_id: i64,

    pub author_id: i64,

    #[sea_orm(column_type = "Text")]
    pub body: String,

    pub posted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::review::Entity",
        from = "(Column::PaperId, Column::ReviewerId)",
        to = "(super::review::Column::PaperId, super::review::Column::ReviewerId)"
    )]
    Review,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

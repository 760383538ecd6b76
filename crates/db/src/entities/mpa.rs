//! MPA rating entity (fixed age-classification reference table).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mpa")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    /// Classification label (e.g. "PG-13")
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film::Entity")]
    Films,
}

impl Related<super::film::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Films.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

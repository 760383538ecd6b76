//! Director entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "director")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_director::Entity")]
    FilmDirectors,
}

impl Related<super::film_director::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmDirectors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

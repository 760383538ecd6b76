//! Genre entity (reference table).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genre")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::film_genre::Entity")]
    FilmGenres,
}

impl Related<super::film_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmGenres.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

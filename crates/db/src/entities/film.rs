//! Film entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "film")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub release_date: Date,

    /// Running time in minutes
    pub duration: i32,

    pub mpa_id: i32,

    /// Mean of all live ratings rounded to one decimal, 0.0 without ratings.
    /// Only the rating aggregator writes this column.
    #[sea_orm(default_value = 0.0)]
    pub score: f64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mpa::Entity",
        from = "Column::MpaId",
        to = "super::mpa::Column::Id"
    )]
    Mpa,
    #[sea_orm(has_many = "super::rating::Entity")]
    Ratings,
    #[sea_orm(has_many = "super::film_genre::Entity")]
    FilmGenres,
    #[sea_orm(has_many = "super::film_director::Entity")]
    FilmDirectors,
}

impl Related<super::mpa::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mpa.def()
    }
}

impl Related<super::rating::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ratings.def()
    }
}

impl Related<super::film_genre::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmGenres.def()
    }
}

impl Related<super::film_director::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FilmDirectors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

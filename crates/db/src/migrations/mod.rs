//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_reference_tables;
mod m20260101_000002_create_user_table;
mod m20260101_000003_create_film_tables;
mod m20260101_000004_create_rating_table;
mod m20260101_000005_create_review_tables;
mod m20260101_000006_create_friendship_table;
mod m20260101_000007_create_event_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_reference_tables::Migration),
            Box::new(m20260101_000002_create_user_table::Migration),
            Box::new(m20260101_000003_create_film_tables::Migration),
            Box::new(m20260101_000004_create_rating_table::Migration),
            Box::new(m20260101_000005_create_review_tables::Migration),
            Box::new(m20260101_000006_create_friendship_table::Migration),
            Box::new(m20260101_000007_create_event_table::Migration),
        ]
    }
}

//! Create rating table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rating::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Rating::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(Rating::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Rating::Value).integer().not_null())
                    .col(
                        ColumnDef::new(Rating::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Rating::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_film")
                            .from(Rating::Table, Rating::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (film_id, user_id) - one rating per user per film
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_film_user")
                    .table(Rating::Table)
                    .col(Rating::FilmId)
                    .col(Rating::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: user_id (neighbor search walks a user's ratings)
        manager
            .create_index(
                Index::create()
                    .name("idx_rating_user_id")
                    .table(Rating::Table)
                    .col(Rating::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Rating {
    Table,
    Id,
    FilmId,
    UserId,
    Value,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

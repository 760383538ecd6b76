//! Create review and review_vote tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Review::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Review::Content).text().not_null())
                    .col(ColumnDef::new(Review::IsPositive).boolean().not_null())
                    .col(ColumnDef::new(Review::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::Useful).integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_film")
                            .from(Review::Table, Review::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: film_id (reviews of a film)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_film_id")
                    .table(Review::Table)
                    .col(Review::FilmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReviewVote::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewVote::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewVote::ReviewId).string_len(32).not_null())
                    .col(ColumnDef::new(ReviewVote::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ReviewVote::Kind).string_len(16).not_null())
                    .col(
                        ColumnDef::new(ReviewVote::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_vote_review")
                            .from(ReviewVote::Table, ReviewVote::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_vote_user")
                            .from(ReviewVote::Table, ReviewVote::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (review_id, user_id) - at most one vote per user per review
        manager
            .create_index(
                Index::create()
                    .name("idx_review_vote_review_user")
                    .table(ReviewVote::Table)
                    .col(ReviewVote::ReviewId)
                    .col(ReviewVote::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewVote::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    Content,
    IsPositive,
    UserId,
    FilmId,
    Useful,
    CreatedAt,
}

#[derive(Iden)]
enum ReviewVote {
    Table,
    Id,
    ReviewId,
    UserId,
    Kind,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
}

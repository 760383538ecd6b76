//! Create film table and its genre/director link tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Film::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Film::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Film::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Film::Description).text().not_null())
                    .col(ColumnDef::new(Film::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Film::Duration).integer().not_null())
                    .col(ColumnDef::new(Film::MpaId).integer().not_null())
                    .col(ColumnDef::new(Film::Score).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Film::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_mpa")
                            .from(Film::Table, Film::MpaId)
                            .to(Mpa::Table, Mpa::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (name, release_date) - duplicate detection key
        manager
            .create_index(
                Index::create()
                    .name("idx_film_name_release_date")
                    .table(Film::Table)
                    .col(Film::Name)
                    .col(Film::ReleaseDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: score (popular listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_film_score")
                    .table(Film::Table)
                    .col(Film::Score)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmGenre::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FilmGenre::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FilmGenre::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(FilmGenre::GenreId).integer().not_null())
                    .col(ColumnDef::new(FilmGenre::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_genre_film")
                            .from(FilmGenre::Table, FilmGenre::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_genre_genre")
                            .from(FilmGenre::Table, FilmGenre::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (film_id, genre_id) - a genre appears once per film
        manager
            .create_index(
                Index::create()
                    .name("idx_film_genre_film_genre")
                    .table(FilmGenre::Table)
                    .col(FilmGenre::FilmId)
                    .col(FilmGenre::GenreId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: genre_id (popular-by-genre filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_film_genre_genre_id")
                    .table(FilmGenre::Table)
                    .col(FilmGenre::GenreId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmDirector::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FilmDirector::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FilmDirector::FilmId).string_len(32).not_null())
                    .col(ColumnDef::new(FilmDirector::DirectorId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_director_film")
                            .from(FilmDirector::Table, FilmDirector::FilmId)
                            .to(Film::Table, Film::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_film_director_director")
                            .from(FilmDirector::Table, FilmDirector::DirectorId)
                            .to(Director::Table, Director::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (film_id, director_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_film_director_film_director")
                    .table(FilmDirector::Table)
                    .col(FilmDirector::FilmId)
                    .col(FilmDirector::DirectorId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: director_id (films of a director)
        manager
            .create_index(
                Index::create()
                    .name("idx_film_director_director_id")
                    .table(FilmDirector::Table)
                    .col(FilmDirector::DirectorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FilmDirector::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FilmGenre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Film::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Film {
    Table,
    Id,
    Name,
    Description,
    ReleaseDate,
    Duration,
    MpaId,
    Score,
    CreatedAt,
}

#[derive(Iden)]
enum FilmGenre {
    Table,
    Id,
    FilmId,
    GenreId,
    Position,
}

#[derive(Iden)]
enum FilmDirector {
    Table,
    Id,
    FilmId,
    DirectorId,
}

#[derive(Iden)]
enum Mpa {
    Table,
    Id,
}

#[derive(Iden)]
enum Genre {
    Table,
    Id,
}

#[derive(Iden)]
enum Director {
    Table,
    Id,
}

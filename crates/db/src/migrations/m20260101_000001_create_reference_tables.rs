//! Create reference tables (mpa, genre, director) and seed the fixed ones.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

const MPA_RATINGS: [(i32, &str); 5] = [(1, "G"), (2, "PG"), (3, "PG-13"), (4, "R"), (5, "NC-17")];

const GENRES: [(i32, &str); 6] = [
    (1, "Comedy"),
    (2, "Drama"),
    (3, "Cartoon"),
    (4, "Thriller"),
    (5, "Documentary"),
    (6, "Action"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mpa::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Mpa::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Mpa::Name).string_len(16).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Genre::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Genre::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Genre::Name).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Director::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Director::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Director::Name).string_len(256).not_null())
                    .to_owned(),
            )
            .await?;

        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        let mut mpa = Query::insert();
        mpa.into_table(Mpa::Table).columns([Mpa::Id, Mpa::Name]);
        for (id, name) in MPA_RATINGS {
            mpa.values([id.into(), name.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        db.execute(backend.build(&mpa)).await?;

        let mut genre = Query::insert();
        genre.into_table(Genre::Table).columns([Genre::Id, Genre::Name]);
        for (id, name) in GENRES {
            genre
                .values([id.into(), name.into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }
        db.execute(backend.build(&genre)).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Director::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Genre::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Mpa::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Mpa {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Genre {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Director {
    Table,
    Id,
    Name,
}

//! Create event table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Event::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Event::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Event::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Event::Timestamp).big_integer().not_null())
                    .col(ColumnDef::new(Event::EventType).string_len(16).not_null())
                    .col(ColumnDef::new(Event::Operation).string_len(16).not_null())
                    .col(ColumnDef::new(Event::EntityId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_user")
                            .from(Event::Table, Event::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (user_id, id) - feed in append order
        manager
            .create_index(
                Index::create()
                    .name("idx_event_user_id")
                    .table(Event::Table)
                    .col(Event::UserId)
                    .col(Event::Id)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Event::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Event {
    Table,
    Id,
    UserId,
    Timestamp,
    EventType,
    Operation,
    EntityId,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

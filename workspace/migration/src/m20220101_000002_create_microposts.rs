use sea_orm_migration::{prelude::*, schema::*};

use crate::m20220101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create microposts table
        manager
            .create_table(
                Table::create()
                    .table(Microposts::Table)
                    .if_not_exists()
                    .col(pk_auto(Microposts::Id))
                    .col(text(Microposts::Content))
                    .col(integer(Microposts::UserId))
                    .col(timestamp_with_time_zone(Microposts::CreatedAt))
                    .col(timestamp_with_time_zone(Microposts::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_microposts_user")
                            .from(Microposts::Table, Microposts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Feeds are read per user, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_microposts_user_id_created_at")
                    .table(Microposts::Table)
                    .col(Microposts::UserId)
                    .col(Microposts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_microposts_user_id_created_at")
                    .table(Microposts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Microposts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Microposts {
    Table,
    Id,
    Content,
    UserId,
    CreatedAt,
    UpdatedAt,
}

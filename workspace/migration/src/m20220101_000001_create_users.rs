use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The unique key on email is the authoritative guard against
        // concurrent sign-ups; emails are stored lower-case.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Name, 50))
                    .col(string_len(Users::Email, 255).unique_key())
                    .col(string(Users::PasswordDigest))
                    .col(string_null(Users::RememberDigest))
                    .col(boolean(Users::Admin).default(false))
                    .col(string_null(Users::ActivationDigest))
                    .col(boolean(Users::Activated).default(false))
                    .col(timestamp_with_time_zone_null(Users::ActivatedAt))
                    .col(string_null(Users::ResetDigest))
                    .col(timestamp_with_time_zone_null(Users::ResetSentAt))
                    .col(timestamp_with_time_zone(Users::CreatedAt))
                    .col(timestamp_with_time_zone(Users::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordDigest,
    RememberDigest,
    Admin,
    ActivationDigest,
    Activated,
    ActivatedAt,
    ResetDigest,
    ResetSentAt,
    CreatedAt,
    UpdatedAt,
}

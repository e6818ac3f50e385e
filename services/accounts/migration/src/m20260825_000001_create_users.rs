use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Enabled).boolean().not_null())
                    .col(ColumnDef::new(Users::AccountLocked).boolean().not_null())
                    .col(ColumnDef::new(Users::LockedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::UnlockAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::ResetCode).string())
                    .col(ColumnDef::new(Users::ResetCodeExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::Roles).integer().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::ResetCode)
                    .name("idx_users_reset_code")
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

#[derive(Iden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    PasswordHash,
    Enabled,
    AccountLocked,
    LockedAt,
    UnlockAt,
    ResetCode,
    ResetCodeExpiresAt,
    Roles,
    CreatedAt,
    UpdatedAt,
}

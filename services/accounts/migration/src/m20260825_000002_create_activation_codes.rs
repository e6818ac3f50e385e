use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivationCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivationCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivationCodes::UserId).uuid().not_null())
                    .col(ColumnDef::new(ActivationCodes::Code).string().not_null())
                    .col(
                        ColumnDef::new(ActivationCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ActivationCodes::ValidatedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ActivationCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ActivationCodes::Table, ActivationCodes::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ActivationCodes::Table)
                    .col(ActivationCodes::UserId)
                    .name("idx_activation_codes_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ActivationCodes::Table)
                    .col(ActivationCodes::Code)
                    .name("idx_activation_codes_code")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivationCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ActivationCodes {
    Table,
    Id,
    UserId,
    Code,
    ExpiresAt,
    ValidatedAt,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ToDo {
    Table,
    Id,
    Name,
    Description,
    Status,
    CreatedAt,
}

const IDX_TO_DO_STATUS: &str = "idx-to_do-status";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ToDo::Table)
                    .if_not_exists()
                    .col(pk_auto(ToDo::Id))
                    .col(string(ToDo::Name))
                    .col(string(ToDo::Description))
                    .col(boolean(ToDo::Status).default(false))
                    .col(date_time(ToDo::CreatedAt))
                    .to_owned(),
            )
            .await?;

        // Listing filtered by status is the only non-key lookup.
        manager
            .create_index(
                Index::create()
                    .name(IDX_TO_DO_STATUS)
                    .table(ToDo::Table)
                    .col(ToDo::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ToDo::Table).to_owned())
            .await
    }
}

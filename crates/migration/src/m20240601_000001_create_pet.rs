//! Create `pet` table.
//! Known fields get typed columns; anything else the client sends lives in `extra`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pet::Table)
                    .if_not_exists()
                    .col(uuid(Pet::Id).primary_key())
                    .col(string(Pet::Name))
                    .col(string(Pet::Category))
                    .col(string_null(Pet::OwnerEmail))
                    .col(double_null(Pet::Price))
                    .col(timestamp_with_time_zone(Pet::Date))
                    .col(json_binary(Pet::Extra))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Pet::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Pet {
    Table,
    Id,
    Name,
    Category,
    OwnerEmail,
    Price,
    Date,
    Extra,
}

//! Create `pet_order` table.
//! `product_id` is deliberately not a foreign key: deleting a pet leaves its orders intact.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PetOrder::Table)
                    .if_not_exists()
                    .col(uuid(PetOrder::Id).primary_key())
                    .col(uuid(PetOrder::ProductId))
                    .col(string(PetOrder::BuyerName))
                    .col(string(PetOrder::ProductName))
                    .col(double(PetOrder::Price))
                    .col(big_integer(PetOrder::Quantity))
                    .col(text(PetOrder::Address))
                    .col(string(PetOrder::Phone))
                    .col(text(PetOrder::AdditionalNotes))
                    .col(string_null(PetOrder::Email))
                    .col(timestamp_with_time_zone(PetOrder::Date))
                    .col(json_binary(PetOrder::Extra))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PetOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PetOrder {
    Table,
    Id,
    ProductId,
    BuyerName,
    ProductName,
    Price,
    Quantity,
    Address,
    Phone,
    AdditionalNotes,
    Email,
    Date,
    Extra,
}

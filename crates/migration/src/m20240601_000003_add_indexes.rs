//! Indexes backing the list filters and the "recent pets" query.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pet_category_owner_email")
                    .table(Pet::Table)
                    .col(Pet::Category)
                    .col(Pet::OwnerEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pet_owner_email")
                    .table(Pet::Table)
                    .col(Pet::OwnerEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pet_date")
                    .table(Pet::Table)
                    .col(Pet::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pet_order_email")
                    .table(PetOrder::Table)
                    .col(PetOrder::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_pet_order_email",
            "idx_pet_date",
            "idx_pet_owner_email",
            "idx_pet_category_owner_email",
        ] {
            manager
                .drop_index(Index::drop().if_exists().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Pet {
    Table,
    Category,
    OwnerEmail,
    Date,
}

#[derive(DeriveIden)]
enum PetOrder {
    Table,
    Email,
}

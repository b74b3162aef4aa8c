//! Create `restaurants` table.
//!
//! `name` is unique; the remaining contact fields are nullable so a full
//! replace can clear them.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Restaurant::Name, 255).unique_key().not_null())
                    .col(ColumnDef::new(Restaurant::Address).string_len(255).null())
                    .col(ColumnDef::new(Restaurant::City).string_len(128).null())
                    .col(ColumnDef::new(Restaurant::State).string_len(32).null())
                    .col(ColumnDef::new(Restaurant::Telephone).string_len(32).null())
                    .col(integer(Restaurant::SeatCapacity).not_null().default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Restaurant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Restaurant {
    #[sea_orm(iden = "restaurants")]
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Telephone,
    SeatCapacity,
}

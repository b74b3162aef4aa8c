//! Create `restaurantpayments` join table.
//!
//! Deleting a restaurant drops its links; payments referenced by a link
//! cannot be deleted out from under it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RestaurantPayment::Table)
                    .if_not_exists()
                    .col(big_integer(RestaurantPayment::RestaurantId).not_null())
                    .col(big_integer(RestaurantPayment::PaymentId).not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_restaurantpayments")
                            .col(RestaurantPayment::RestaurantId)
                            .col(RestaurantPayment::PaymentId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurantpayment_restaurant")
                            .from(RestaurantPayment::Table, RestaurantPayment::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurantpayment_payment")
                            .from(RestaurantPayment::Table, RestaurantPayment::PaymentId)
                            .to(Payment::Table, Payment::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RestaurantPayment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RestaurantPayment {
    #[sea_orm(iden = "restaurantpayments")]
    Table,
    RestaurantId,
    PaymentId,
}

#[derive(DeriveIden)]
enum Restaurant {
    #[sea_orm(iden = "restaurants")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Payment {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
}

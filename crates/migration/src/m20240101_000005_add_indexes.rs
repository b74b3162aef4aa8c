use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Menus: index on restaurant_id (child rebuilds, counts, dish lookups)
        manager
            .create_index(
                Index::create()
                    .name("idx_menu_restaurant")
                    .table(Menu::Table)
                    .col(Menu::RestaurantId)
                    .to_owned(),
            )
            .await?;

        // Restaurants: index on state
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_state")
                    .table(Restaurant::Table)
                    .col(Restaurant::State)
                    .to_owned(),
            )
            .await?;

        // Join table: reverse lookup by payment
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurantpayment_payment")
                    .table(RestaurantPayment::Table)
                    .col(RestaurantPayment::PaymentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_menu_restaurant").table(Menu::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_restaurant_state").table(Restaurant::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_restaurantpayment_payment")
                    .table(RestaurantPayment::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Menu {
    #[sea_orm(iden = "menus")]
    Table,
    RestaurantId,
}

#[derive(DeriveIden)]
enum Restaurant {
    #[sea_orm(iden = "restaurants")]
    Table,
    State,
}

#[derive(DeriveIden)]
enum RestaurantPayment {
    #[sea_orm(iden = "restaurantpayments")]
    Table,
    PaymentId,
}

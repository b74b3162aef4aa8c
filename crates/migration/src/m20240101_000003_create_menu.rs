//! Create `menus` table with FK to `restaurants`.
//!
//! Menus are owned by exactly one restaurant and go away with it.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menu::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Menu::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Menu::Dish, 255).not_null())
                    .col(double(Menu::Price).not_null())
                    .col(big_integer(Menu::RestaurantId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_menu_restaurant")
                            .from(Menu::Table, Menu::RestaurantId)
                            .to(Restaurant::Table, Restaurant::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Menu::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Menu {
    #[sea_orm(iden = "menus")]
    Table,
    Id,
    Dish,
    Price,
    RestaurantId,
}

#[derive(DeriveIden)]
enum Restaurant {
    #[sea_orm(iden = "restaurants")]
    Table,
    Id,
}

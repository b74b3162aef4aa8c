//! Join table linking restaurants to the payment methods they accept.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{payment, restaurant};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurantpayments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub restaurant_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub payment_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Restaurant,
    Payment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Restaurant => Entity::belongs_to(restaurant::Entity)
                .from(Column::RestaurantId)
                .to(restaurant::Column::Id)
                .into(),
            Relation::Payment => Entity::belongs_to(payment::Entity)
                .from(Column::PaymentId)
                .to(payment::Column::Id)
                .into(),
        }
    }
}

impl Related<restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, restaurant};

pub const DISH_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub dish: String,
    pub price: f64,
    pub restaurant_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Restaurant }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Restaurant => Entity::belongs_to(restaurant::Entity)
                .from(Column::RestaurantId)
                .to(restaurant::Column::Id)
                .into(),
        }
    }
}

impl Related<restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_dish(dish: &str) -> Result<(), errors::ModelError> {
    if dish.trim().is_empty() {
        return Err(errors::ModelError::Validation("menu dish required".into()));
    }
    if dish.chars().count() > DISH_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("menu dish longer than {DISH_MAX_LEN} characters")));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), errors::ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(errors::ModelError::Validation("menu price must be a non-negative number".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_be_finite_and_non_negative() {
        assert!(validate_price(9.99).is_ok());
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-0.5).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn empty_dish_rejected() {
        assert!(validate_dish(" ").is_err());
        assert!(validate_dish("Burger").is_ok());
        assert!(validate_dish(&"d".repeat(DISH_MAX_LEN + 1)).is_err());
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors, menu, payment, restaurant_payment};

pub const NAME_MAX_LEN: usize = 255;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const CITY_MAX_LEN: usize = 128;
pub const STATE_MAX_LEN: usize = 32;
pub const TELEPHONE_MAX_LEN: usize = 32;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub telephone: Option<String>,
    pub seat_capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Menu,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Menu => Entity::has_many(menu::Entity).into(),
        }
    }
}

impl Related<menu::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Menu.def()
    }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef {
        restaurant_payment::Relation::Payment.def()
    }

    fn via() -> Option<RelationDef> {
        Some(restaurant_payment::Relation::Restaurant.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("restaurant name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("restaurant name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), errors::ModelError> {
    match value {
        Some(v) if v.chars().count() > max => {
            Err(errors::ModelError::Validation(format!("restaurant {field} longer than {max} characters")))
        }
        _ => Ok(()),
    }
}

/// Optional contact fields must fit their column widths.
pub fn validate_contact(
    address: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    telephone: Option<&str>,
) -> Result<(), errors::ModelError> {
    check_len("address", address, ADDRESS_MAX_LEN)?;
    check_len("city", city, CITY_MAX_LEN)?;
    check_len("state", state, STATE_MAX_LEN)?;
    check_len("telephone", telephone, TELEPHONE_MAX_LEN)
}

pub fn validate_seat_capacity(seats: i32) -> Result<(), errors::ModelError> {
    if seats < 0 {
        return Err(errors::ModelError::Validation("seat_capacity must be >= 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Supreme Eats").is_ok());
    }

    #[test]
    fn overlong_name_rejected() {
        let long = "x".repeat(NAME_MAX_LEN + 1);
        assert!(validate_name(&long).is_err());
        assert!(validate_name(&"x".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn contact_fields_bounded_by_column_width() {
        assert!(validate_contact(None, None, None, None).is_ok());
        assert!(validate_contact(Some("123 Main Street"), Some("City"), Some("ST"), Some("555-555-1234")).is_ok());
        let state = "s".repeat(STATE_MAX_LEN + 1);
        assert!(validate_contact(None, None, Some(&state), None).is_err());
        assert!(validate_contact(None, None, Some(&"s".repeat(STATE_MAX_LEN)), None).is_ok());
        assert!(validate_contact(None, Some(&"c".repeat(CITY_MAX_LEN + 1)), None, None).is_err());
        assert!(validate_contact(Some(&"a".repeat(ADDRESS_MAX_LEN + 1)), None, None, None).is_err());
        assert!(validate_contact(None, None, None, Some(&"5".repeat(TELEPHONE_MAX_LEN + 1))).is_err());
    }

    #[test]
    fn negative_seats_rejected() {
        assert!(validate_seat_capacity(-1).is_err());
        assert!(validate_seat_capacity(0).is_ok());
    }
}

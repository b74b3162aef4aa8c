use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub payment_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub const PAYMENT_TYPE_MAX_LEN: usize = 64;

pub fn validate_payment_type(payment_type: &str) -> Result<(), errors::ModelError> {
    if payment_type.trim().is_empty() {
        return Err(errors::ModelError::Validation("payment type required".into()));
    }
    if payment_type.chars().count() > PAYMENT_TYPE_MAX_LEN {
        return Err(errors::ModelError::Validation(format!("payment type longer than {PAYMENT_TYPE_MAX_LEN} characters")));
    }
    Ok(())
}

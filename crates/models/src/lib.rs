//! SeaORM entities for restaurants, their menus and the payment methods they accept.

pub mod errors;
pub mod db;
pub mod restaurant;
pub mod menu;
pub mod payment;
pub mod restaurant_payment;

#[cfg(test)]
mod tests;

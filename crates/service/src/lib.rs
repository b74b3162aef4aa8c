//! Service layer providing restaurant record operations on top of models.
//! - Storage access goes through the `RestaurantRepository` trait.
//! - `RestaurantService` owns the replace/merge/cascade rules.
//! - Reuses validation and entity definitions in `models` crate.

pub mod errors;
pub mod restaurant;
#[cfg(test)]
pub mod test_support;

pub use restaurant::RestaurantService;

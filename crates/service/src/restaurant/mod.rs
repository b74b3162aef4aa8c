//! Restaurant records: domain types, storage abstraction, and the record service.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;
pub mod seed;

pub use service::RestaurantService;

//! Charger catalog
//!
//! The resources that can be booked. Owned by the station catalog; the
//! booking core only reads it.

pub mod model;
pub mod repository;

pub use model::Charger;
pub use repository::ChargerRepository;

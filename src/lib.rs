//! # ChargeSlot
//!
//! Slot reservation and booking conflict engine for EV chargers.
//!
//! - **domain**: entities, the booking state machine, error taxonomy and
//!   repository traits
//! - **application**: slot catalog, availability, reservation engine,
//!   booking lifecycle, revenue aggregation
//! - **infrastructure**: SeaORM entities, migrations and repositories
//! - **interfaces**: axum REST API with Swagger UI
//! - **auth**: JWT bearer authentication
//! - **server**: process bootstrap and graceful shutdown

pub mod application;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

#[cfg(test)]
mod test_support;

pub use application::BookingServices;
pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};
pub use interfaces::http::create_api_router;

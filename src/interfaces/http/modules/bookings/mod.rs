//! Booking endpoints: create, inspect, confirm, cancel, complete

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;

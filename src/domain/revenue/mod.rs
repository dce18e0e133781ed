//! Revenue aggregate
//!
//! Per-owner running totals, maintained as a materialized view over
//! completed bookings.

pub mod model;
pub mod repository;

pub use model::{ReconciliationReport, RevenueDelta, RevenueTotal};
pub use repository::RevenueRepository;

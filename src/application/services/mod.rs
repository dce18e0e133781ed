//! Application services
//!
//! Leaf-first: slot catalog, availability, reservation engine, booking
//! lifecycle, revenue aggregation.

pub mod availability;
pub mod completion_sweeper;
pub mod lifecycle;
pub mod reservation;
pub mod revenue;
pub mod slot_catalog;

pub use availability::AvailabilityView;
pub use completion_sweeper::start_completion_sweeper;
pub use lifecycle::BookingLifecycle;
pub use reservation::{BookingRequest, ReservationEngine, ReservationPolicy};
pub use revenue::RevenueAggregator;
pub use slot_catalog::SlotCatalog;

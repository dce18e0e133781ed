//! Slot catalog
//!
//! Fixed-length units a charger's day is divided into. Availability is
//! always derived from active bookings, never stored on the slot.

pub mod model;
pub mod repository;

pub use model::{Slot, SlotAvailability, SlotSchedule};
pub use repository::SlotRepository;

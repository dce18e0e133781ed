//! Domain layer
//!
//! Entities, invariants and repository interfaces of the booking core.
//! Nothing in here knows about SeaORM or HTTP.

pub mod booking;
pub mod charger;
pub mod clock;
pub mod error;
pub mod money;
pub mod payment;
pub mod repositories;
pub mod revenue;
pub mod slot;

pub use booking::{Actor, Booking, BookingEvent, BookingFilter, BookingStatus, TimeWindow};
pub use charger::Charger;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{DomainError, DomainResult, ErrorKind};
pub use payment::{Payment, PaymentStatus};
pub use repositories::RepositoryProvider;
pub use revenue::{ReconciliationReport, RevenueTotal};
pub use slot::{Slot, SlotAvailability, SlotSchedule};

//! Booking aggregate
//!
//! Contains the Booking entity, the half-open time window and its overlap
//! predicate, the status state machine, and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Actor, Booking, BookingEvent, BookingFilter, BookingStatus, TimeWindow};
pub use repository::{BookingRecord, BookingRepository, PaymentChange, StatusChange};

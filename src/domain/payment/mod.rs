//! Payment aggregate
//!
//! Only the status ledger is modeled; capture and settlement happen
//! elsewhere. Payments are persisted through the booking repository
//! because they are only ever written together with their booking.

pub mod model;

pub use model::{Payment, PaymentStatus};

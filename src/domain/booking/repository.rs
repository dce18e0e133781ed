//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::{Booking, BookingEvent, BookingStatus};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::revenue::RevenueDelta;
use crate::domain::DomainResult;

/// A booking together with its payment.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRecord {
    pub booking: Booking,
    pub payment: Payment,
}

/// Payment status move that rides along with a booking transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentChange {
    pub from: PaymentStatus,
    pub to: PaymentStatus,
}

/// Everything one lifecycle transition writes. Applied atomically; the
/// booking row is only updated if it is still in `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub booking_id: String,
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub payment: Option<PaymentChange>,
    pub revenue: Option<RevenueDelta>,
    pub actor_id: Option<String>,
    pub at: DateTime<Utc>,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find booking by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Find the payment belonging to a booking
    async fn find_payment(&self, booking_id: &str) -> DomainResult<Option<Payment>>;

    /// Pending and confirmed bookings of a charger on one day
    async fn find_active_for_day(
        &self,
        charger_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Booking>>;

    /// Bookings made by a requester, newest slot first
    async fn find_by_requester(&self, requester_id: &str) -> DomainResult<Vec<Booking>>;

    /// Bookings on any of the given chargers, newest slot first
    async fn find_by_chargers(&self, charger_ids: &[String]) -> DomainResult<Vec<Booking>>;

    /// Confirmed bookings dated on or before `date`
    async fn find_confirmed_until(&self, date: NaiveDate) -> DomainResult<Vec<Booking>>;

    /// Insert booking + payment if the window is still free.
    ///
    /// Serializes against every other booking attempt on the same charger
    /// at the storage layer, re-checks overlap inside that critical
    /// section and commits both rows or neither. Returns `SlotConflict`
    /// when the window is taken and `PersistenceConflict` when the store
    /// reports lost contention.
    async fn create_if_free(&self, booking: Booking, payment: Payment)
        -> DomainResult<BookingRecord>;

    /// Apply a status transition with its side effects in one transaction.
    /// Returns `PersistenceConflict` if the booking (or payment) is no
    /// longer in the expected status.
    async fn apply_transition(&self, change: StatusChange) -> DomainResult<Booking>;

    /// Audit trail of a booking, oldest first
    async fn history(&self, booking_id: &str) -> DomainResult<Vec<BookingEvent>>;
}

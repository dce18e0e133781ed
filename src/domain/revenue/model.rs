//! Owner revenue running totals

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::booking::BookingStatus;

/// Stored running total for one charger owner.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueTotal {
    pub owner_id: String,
    pub total: Decimal,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RevenueTotal {
    pub fn zero(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            total: Decimal::ZERO,
            updated_at: None,
        }
    }
}

/// Signed adjustment applied to an owner's total in the same transaction
/// as the booking transition that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueDelta {
    pub owner_id: String,
    pub amount_cents: i64,
}

impl RevenueDelta {
    /// `+amount` when a booking enters `completed`, `-amount` when it
    /// leaves it, nothing otherwise.
    pub fn for_transition(
        owner_id: &str,
        amount_cents: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Option<Self> {
        let sign = match (from == BookingStatus::Completed, to == BookingStatus::Completed) {
            (false, true) => 1,
            (true, false) => -1,
            _ => return None,
        };
        Some(Self {
            owner_id: owner_id.to_string(),
            amount_cents: sign * amount_cents,
        })
    }
}

/// Stored total compared with the sum over the owner's completed bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    pub owner_id: String,
    pub stored: Decimal,
    pub computed: Decimal,
    pub completed_bookings: u64,
}

impl ReconciliationReport {
    pub fn is_consistent(&self) -> bool {
        self.stored == self.computed
    }

    pub fn drift(&self) -> Decimal {
        self.stored - self.computed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_only_when_crossing_completed() {
        use BookingStatus::*;
        let d = RevenueDelta::for_transition("owner-1", 5000, Confirmed, Completed).unwrap();
        assert_eq!(d.amount_cents, 5000);
        let reversal = RevenueDelta::for_transition("owner-1", 5000, Completed, Cancelled).unwrap();
        assert_eq!(reversal.amount_cents, -5000);
        assert!(RevenueDelta::for_transition("owner-1", 5000, Confirmed, Cancelled).is_none());
        assert!(RevenueDelta::for_transition("owner-1", 5000, Pending, Confirmed).is_none());
    }

    #[test]
    fn drift_is_stored_minus_computed() {
        let r = ReconciliationReport {
            owner_id: "owner-1".into(),
            stored: Decimal::from(250),
            computed: Decimal::from(200),
            completed_bookings: 2,
        };
        assert!(!r.is_consistent());
        assert_eq!(r.drift(), Decimal::from(50));
    }
}

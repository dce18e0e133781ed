//! Payment status ledger entry

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::booking::Booking;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Status a payment moves to when its booking is cancelled.
    /// Failed and already refunded payments stay where they are.
    pub fn on_cancellation(&self) -> Option<PaymentStatus> {
        match self {
            Self::Pending | Self::Completed => Some(Self::Refunded),
            Self::Failed | Self::Refunded => None,
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(DomainError::Storage(format!(
                "Unknown payment status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment record, 1:1 with a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// A pending payment for exactly the booking's total.
    pub fn pending_for(id: impl Into<String>, booking: &Booking) -> Self {
        Self {
            id: id.into(),
            booking_id: booking.id.clone(),
            amount: booking.total_amount,
            status: PaymentStatus::Pending,
            created_at: booking.created_at,
            updated_at: booking.created_at,
        }
    }
}

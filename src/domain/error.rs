//! Domain error taxonomy
//!
//! Every failure the booking core can report. Callers branch on
//! [`DomainError::kind`] to decide between fixing their input, choosing
//! another window, or giving up.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use super::booking::BookingStatus;

/// Broad class of a [`DomainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, rejected before touching storage.
    Validation,
    /// Overlap, lost race or stale status transition.
    Conflict,
    NotFound,
    Forbidden,
    Internal,
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Charger {0} not found")]
    ResourceNotFound(String),

    #[error("Charger {0} is not active")]
    ResourceInactive(String),

    #[error("Invalid window: end {end} must be after start {start}")]
    InvalidWindow { start: NaiveTime, end: NaiveTime },

    #[error("Date {date} is outside the admission window {first}..={last}")]
    DateOutOfWindow {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("Requested window on charger {charger_id} ({date}) overlaps an active booking")]
    SlotConflict { charger_id: String, date: NaiveDate },

    /// The store rejected a write because a concurrent writer got there
    /// first (lock contention, serialization failure, stale status).
    #[error("Concurrent modification: {0}")]
    PersistenceConflict(String),

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(String),

    #[error("Booking {0} is already completed")]
    AlreadyCompleted(String),

    #[error("Invalid transition for booking {booking_id}: {from} -> {to}")]
    InvalidTransition {
        booking_id: String,
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn booking_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "Booking",
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidWindow { .. } | Self::DateOutOfWindow { .. } | Self::Validation(_) => {
                ErrorKind::Validation
            }
            // An inactive charger is a request the caller has to correct,
            // not something a retry could fix.
            Self::ResourceInactive(_) => ErrorKind::Validation,
            Self::SlotConflict { .. }
            | Self::PersistenceConflict(_)
            | Self::AlreadyCancelled(_)
            | Self::AlreadyCompleted(_)
            | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::ResourceNotFound(_) | Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AccessDenied(_) => ErrorKind::Forbidden,
            Self::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "RESOURCE_NOT_FOUND",
            Self::ResourceInactive(_) => "RESOURCE_INACTIVE",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
            Self::DateOutOfWindow { .. } => "DATE_OUT_OF_WINDOW",
            Self::SlotConflict { .. } => "SLOT_CONFLICT",
            Self::PersistenceConflict(_) => "PERSISTENCE_CONFLICT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AccessDenied(_) => "ACCESS_DENIED",
            Self::AlreadyCancelled(_) => "ALREADY_CANCELLED",
            Self::AlreadyCompleted(_) => "ALREADY_COMPLETED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Validation(_) => "VALIDATION",
            Self::Storage(_) => "STORAGE",
        }
    }

    /// Whether re-reading current state and deciding again may succeed.
    pub fn is_stale_write(&self) -> bool {
        matches!(self, Self::PersistenceConflict(_))
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_not_conflicts() {
        let err = DomainError::InvalidWindow {
            start: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), "INVALID_WINDOW");
    }

    #[test]
    fn lost_race_is_reported_as_conflict() {
        let err = DomainError::PersistenceConflict("database is locked".into());
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.is_stale_write());
        assert!(!DomainError::Storage("disk full".into()).is_stale_write());
    }

    #[test]
    fn authorization_and_lookup_kinds() {
        assert_eq!(
            DomainError::AccessDenied("x".into()).kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            DomainError::booking_not_found("b-1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DomainError::ResourceNotFound("CH-9".into()).kind(),
            ErrorKind::NotFound
        );
    }
}

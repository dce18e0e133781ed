//! Booking domain entity

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::domain::error::{DomainError, DomainResult};

// ── TimeWindow ─────────────────────────────────────────────────

/// Half-open interval `[start, end)` within one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Build a window, rejecting empty and inverted ones.
    pub fn new(start: NaiveTime, end: NaiveTime) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The one overlap predicate used everywhere: `a1 < b2 && b1 < a2`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// True when no active booking in `bookings` overlaps this window.
    pub fn is_free_among<'a>(&self, bookings: impl IntoIterator<Item = &'a Booking>) -> bool {
        !bookings
            .into_iter()
            .any(|b| b.is_active() && b.window.overlaps(self))
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ── BookingStatus ──────────────────────────────────────────────

/// Booking status
///
/// ```text
/// pending   -> confirmed | cancelled
/// confirmed -> completed | cancelled
/// completed, cancelled: terminal
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Statuses that hold the charger and take part in overlap checks.
    pub const ACTIVE: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(DomainError::Storage(format!(
                "Unknown booking status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Actor ──────────────────────────────────────────────────────

/// The authenticated caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: false,
        }
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_admin: true,
        }
    }

    /// Original requester or an administrator.
    pub fn may_manage(&self, booking: &Booking) -> bool {
        self.is_admin || booking.requester_id == self.id
    }
}

// ── Booking ────────────────────────────────────────────────────

/// A reservation of one charger for one window on one day.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub charger_id: String,
    /// Owner of the charger when the booking was made; revenue is credited here.
    pub owner_id: String,
    pub requester_id: String,
    pub booking_date: NaiveDate,
    pub window: TimeWindow,
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        id: impl Into<String>,
        charger_id: impl Into<String>,
        owner_id: impl Into<String>,
        requester_id: impl Into<String>,
        booking_date: NaiveDate,
        window: TimeWindow,
        total_amount: Decimal,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            charger_id: charger_id.into(),
            owner_id: owner_id.into(),
            requester_id: requester_id.into(),
            booking_date,
            window,
            total_amount,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.booking_date.and_time(self.window.end)
    }

    /// Check that moving to `target` is a legal step from the current status.
    pub fn check_transition(&self, target: BookingStatus) -> DomainResult<()> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        match (self.status, target) {
            (BookingStatus::Cancelled, BookingStatus::Cancelled) => {
                Err(DomainError::AlreadyCancelled(self.id.clone()))
            }
            (BookingStatus::Completed, BookingStatus::Cancelled) => {
                Err(DomainError::AlreadyCompleted(self.id.clone()))
            }
            (from, to) => Err(DomainError::InvalidTransition {
                booking_id: self.id.clone(),
                from,
                to,
            }),
        }
    }
}

/// One recorded status change of a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingEvent {
    pub booking_id: String,
    /// `None` for the creation event.
    pub from_status: Option<BookingStatus>,
    pub to_status: BookingStatus,
    pub actor_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Selects which bookings a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingFilter {
    Requester(String),
    Charger(String),
    /// Every booking on chargers belonging to this owner.
    Owner(String),
}

// ── Tests ──────────────────────────────────────────────────────

//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::booking::BookingRecord;
use crate::domain::{Booking, BookingEvent, Payment};

/// Request body for `POST /api/v1/bookings`. The requester is taken from
/// the bearer token, never from the body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, max = 64, message = "charger_id must be 1-64 characters"))]
    pub charger_id: String,
    /// `YYYY-MM-DD`, `DD-MM-YYYY` or `DD/MM/YYYY`
    #[validate(length(min = 8, max = 10, message = "date must look like YYYY-MM-DD"))]
    pub date: String,
    /// `HH:MM:SS` or `HH:MM`
    #[validate(length(min = 4, max = 8))]
    pub start_time: String,
    #[validate(length(min = 4, max = 8))]
    pub end_time: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub charger_id: String,
    pub requester_id: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    /// Decimal with two places, e.g. `"50.00"`
    pub total_amount: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            charger_id: b.charger_id,
            requester_id: b.requester_id,
            date: b.booking_date.format("%Y-%m-%d").to_string(),
            start_time: b.window.start.format("%H:%M:%S").to_string(),
            end_time: b.window.end.format("%H:%M:%S").to_string(),
            total_amount: format!("{:.2}", b.total_amount),
            status: b.status.to_string(),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub id: String,
    pub amount: String,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            amount: format!("{:.2}", p.amount),
            status: p.status.to_string(),
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDetailsDto {
    pub booking: BookingDto,
    pub payment: PaymentDto,
}

impl From<BookingRecord> for BookingDetailsDto {
    fn from(record: BookingRecord) -> Self {
        Self {
            booking: record.booking.into(),
            payment: record.payment.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingEventDto {
    /// `null` for the creation event
    pub from_status: Option<String>,
    pub to_status: String,
    pub actor_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingEvent> for BookingEventDto {
    fn from(e: BookingEvent) -> Self {
        Self {
            from_status: e.from_status.map(|s| s.to_string()),
            to_status: e.to_status.to_string(),
            actor_id: e.actor_id,
            created_at: e.created_at,
        }
    }
}

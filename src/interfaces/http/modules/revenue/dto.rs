//! Revenue DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ReconciliationReport, RevenueTotal};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevenueDto {
    pub owner_id: String,
    pub total: String,
    /// `null` until the first booking completes
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RevenueTotal> for RevenueDto {
    fn from(t: RevenueTotal) -> Self {
        Self {
            owner_id: t.owner_id,
            total: format!("{:.2}", t.total),
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReconciliationDto {
    pub owner_id: String,
    /// Running total as stored
    pub stored: String,
    /// Sum over the owner's completed bookings
    pub computed: String,
    pub drift: String,
    pub completed_bookings: u64,
    pub consistent: bool,
}

impl From<ReconciliationReport> for ReconciliationDto {
    fn from(r: ReconciliationReport) -> Self {
        Self {
            consistent: r.is_consistent(),
            drift: format!("{:.2}", r.drift()),
            stored: format!("{:.2}", r.stored),
            computed: format!("{:.2}", r.computed),
            completed_bookings: r.completed_bookings,
            owner_id: r.owner_id,
        }
    }
}

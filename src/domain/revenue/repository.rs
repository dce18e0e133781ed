//! Revenue repository interface

use async_trait::async_trait;

use super::model::{ReconciliationReport, RevenueTotal};
use crate::domain::DomainResult;

/// Read side of the owner revenue view. Writes happen only as part of a
/// booking transition (see `BookingRepository::apply_transition`).
#[async_trait]
pub trait RevenueRepository: Send + Sync {
    /// Stored running total for an owner, if any booking of theirs ever completed
    async fn find_total(&self, owner_id: &str) -> DomainResult<Option<RevenueTotal>>;

    /// All stored totals
    async fn find_all(&self) -> DomainResult<Vec<RevenueTotal>>;

    /// Owners that have chargers, bookings or a stored total
    async fn known_owners(&self) -> DomainResult<Vec<String>>;

    /// Compare stored total with the sum over completed bookings recorded
    /// against the owner, read in one transaction so both sides see the
    /// same snapshot
    async fn reconcile(&self, owner_id: &str) -> DomainResult<ReconciliationReport>;
}

//! Repository access for the domain layer

use super::booking::BookingRepository;
use super::charger::ChargerRepository;
use super::revenue::RevenueRepository;
use super::slot::SlotRepository;

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let charger = repos.chargers().find_by_id("CH-1").await?;
///     let booked = repos.bookings().find_active_for_day("CH-1", date).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn chargers(&self) -> &dyn ChargerRepository;
    fn slots(&self) -> &dyn SlotRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn revenue(&self) -> &dyn RevenueRepository;
}

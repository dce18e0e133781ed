//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::charger::ChargerRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::revenue::RevenueRepository;
use crate::domain::slot::SlotRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::charger_repository::SeaOrmChargerRepository;
use super::revenue_repository::SeaOrmRevenueRepository;
use super::slot_repository::SeaOrmSlotRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let charger = repos.chargers().find_by_id("CH-1").await?;
/// let taken = repos.bookings().find_active_for_day("CH-1", date).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    chargers: SeaOrmChargerRepository,
    slots: SeaOrmSlotRepository,
    bookings: SeaOrmBookingRepository,
    revenue: SeaOrmRevenueRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            chargers: SeaOrmChargerRepository::new(db.clone()),
            slots: SeaOrmSlotRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            revenue: SeaOrmRevenueRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn chargers(&self) -> &dyn ChargerRepository {
        &self.chargers
    }

    fn slots(&self) -> &dyn SlotRepository {
        &self.slots
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn revenue(&self) -> &dyn RevenueRepository {
        &self.revenue
    }
}

//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_chargers;
mod m20250101_000002_create_slots;
mod m20250101_000003_create_bookings;
mod m20250101_000004_create_payments;
mod m20250101_000005_create_owner_revenue;
mod m20250101_000006_create_booking_guards;
mod m20250101_000007_create_booking_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_chargers::Migration),
            Box::new(m20250101_000002_create_slots::Migration),
            Box::new(m20250101_000003_create_bookings::Migration),
            Box::new(m20250101_000004_create_payments::Migration),
            Box::new(m20250101_000005_create_owner_revenue::Migration),
            Box::new(m20250101_000006_create_booking_guards::Migration),
            Box::new(m20250101_000007_create_booking_events::Migration),
        ]
    }
}

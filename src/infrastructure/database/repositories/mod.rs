//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod booking_repository;
pub mod charger_repository;
pub mod repository_provider;
pub mod revenue_repository;
pub mod slot_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Driver messages that mean another writer held the row or table.
const CONTENTION_MARKERS: [&str; 4] = [
    "database is locked",
    "database table is locked",
    "could not serialize",
    "deadlock detected",
];

/// Map a SeaORM error onto the domain taxonomy. Lock contention and
/// unique-key races become `PersistenceConflict`; everything else is an
/// opaque storage failure.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        return DomainError::PersistenceConflict(msg);
    }
    let msg = e.to_string();
    let lower = msg.to_lowercase();
    if CONTENTION_MARKERS.iter().any(|m| lower.contains(m)) {
        DomainError::PersistenceConflict(msg)
    } else {
        DomainError::Storage(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Booking, Payment, RepositoryProvider};
    use crate::infrastructure::database::entities::charger;
    use crate::test_support::{seeded_db, today, window, CHARGER, INACTIVE_CHARGER, OWNER};
    use rust_decimal::Decimal;
    use sea_orm::EntityTrait;

    #[test]
    fn lock_contention_maps_to_persistence_conflict() {
        let err = db_err(DbErr::Custom("database is locked".into()));
        assert!(matches!(err, DomainError::PersistenceConflict(_)));

        let err = db_err(DbErr::Custom(
            "ERROR: could not serialize access due to concurrent update".into(),
        ));
        assert!(err.is_stale_write());
    }

    #[test]
    fn other_failures_are_storage_errors() {
        let err = db_err(DbErr::Custom("no such table: bookings".into()));
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn charger_with_bookings_cannot_be_deleted() {
        let db = seeded_db().await;
        let repos = SeaOrmRepositoryProvider::new(db.clone());
        let booking = Booking::new("b-1", CHARGER, OWNER, "user-1", today(), window((9, 0), (10, 0)), Decimal::from(100));
        let payment = Payment::pending_for("pay-b-1", &booking);
        repos.bookings().create_if_free(booking, payment).await.unwrap();

        let deleted = charger::Entity::delete_by_id(CHARGER.to_string()).exec(&db).await;
        assert!(deleted.is_err());

        assert!(repos.bookings().find_by_id("b-1").await.unwrap().is_some());
        assert!(repos.bookings().find_payment("b-1").await.unwrap().is_some());
        assert_eq!(repos.bookings().history("b-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn charger_without_bookings_can_be_deleted() {
        let db = seeded_db().await;
        let result = charger::Entity::delete_by_id(INACTIVE_CHARGER.to_string())
            .exec(&db)
            .await
            .unwrap();
        assert_eq!(result.rows_affected, 1);
    }
}

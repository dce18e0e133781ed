//! Shared fixtures for unit tests: a migrated in-memory database seeded
//! with a small charger catalog and a clock pinned to a known day.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::domain::{Charger, FixedClock, RepositoryProvider, TimeWindow};
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::{init_database, DatabaseConfig};

pub const CHARGER: &str = "CH-1";
pub const CHEAP_CHARGER: &str = "CH-2";
pub const INACTIVE_CHARGER: &str = "CH-OFF";
pub const OWNER: &str = "owner-1";
pub const OTHER_OWNER: &str = "owner-2";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn window(a: (u32, u32), b: (u32, u32)) -> TimeWindow {
    TimeWindow::new(t(a.0, a.1), t(b.0, b.1)).unwrap()
}

/// Clock at 08:00 on [`today`].
pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(today().and_time(t(8, 0))))
}

async fn migrated_db(config: &DatabaseConfig) -> DatabaseConnection {
    let db = init_database(config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Config for a fresh SQLite file under the temp dir, pooled with
/// `max_connections` so concurrent writers really contend. The caller
/// removes the file.
pub fn temp_file_config(max_connections: u32) -> (DatabaseConfig, PathBuf) {
    let path = std::env::temp_dir().join(format!("chargeslot-{}.db", Uuid::new_v4()));
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        max_connections,
    };
    (config, path)
}

/// A fresh database holding:
/// - `CH-1`: owner-1, 100.00/h, active
/// - `CH-2`: owner-1, 40.00/h, active
/// - `CH-OFF`: owner-2, 80.00/h, inactive
pub async fn seeded_db() -> DatabaseConnection {
    seeded_db_with(&DatabaseConfig::in_memory()).await
}

/// [`seeded_db`] over an explicit connection config.
pub async fn seeded_db_with(config: &DatabaseConfig) -> DatabaseConnection {
    let db = migrated_db(config).await;
    let repos = SeaOrmRepositoryProvider::new(db.clone());

    let chargers = [
        Charger::new(CHARGER, OWNER, Decimal::from(100)),
        Charger::new(CHEAP_CHARGER, OWNER, Decimal::from(40)),
        Charger {
            is_active: false,
            ..Charger::new(INACTIVE_CHARGER, OTHER_OWNER, Decimal::from(80))
        },
    ];
    for charger in chargers {
        repos.chargers().save(charger).await.unwrap();
    }

    db
}

/// Repositories over [`seeded_db`].
pub async fn seeded_repos() -> Arc<dyn RepositoryProvider> {
    Arc::new(SeaOrmRepositoryProvider::new(seeded_db().await))
}

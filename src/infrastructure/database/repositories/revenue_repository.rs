//! SeaORM implementation of RevenueRepository

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};

use super::db_err;
use crate::domain::booking::BookingStatus;
use crate::domain::money::from_cents;
use crate::domain::revenue::{ReconciliationReport, RevenueRepository, RevenueTotal};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::{booking, charger, owner_revenue};

pub struct SeaOrmRevenueRepository {
    db: DatabaseConnection,
}

impl SeaOrmRevenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: owner_revenue::Model) -> RevenueTotal {
    RevenueTotal {
        owner_id: m.owner_id,
        total: from_cents(m.total_cents),
        updated_at: Some(m.updated_at),
    }
}

#[async_trait]
impl RevenueRepository for SeaOrmRevenueRepository {
    async fn find_total(&self, owner_id: &str) -> DomainResult<Option<RevenueTotal>> {
        let model = owner_revenue::Entity::find_by_id(owner_id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<RevenueTotal>> {
        let models = owner_revenue::Entity::find()
            .order_by_asc(owner_revenue::Column::OwnerId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn known_owners(&self) -> DomainResult<Vec<String>> {
        let from_chargers: Vec<String> = charger::Entity::find()
            .select_only()
            .column(charger::Column::OwnerId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let from_totals: Vec<String> = owner_revenue::Entity::find()
            .select_only()
            .column(owner_revenue::Column::OwnerId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let from_bookings: Vec<String> = booking::Entity::find()
            .select_only()
            .column(booking::Column::OwnerId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let owners: BTreeSet<String> = from_chargers
            .into_iter()
            .chain(from_totals)
            .chain(from_bookings)
            .collect();
        Ok(owners.into_iter().collect())
    }

    async fn reconcile(&self, owner_id: &str) -> DomainResult<ReconciliationReport> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let stored_cents = owner_revenue::Entity::find_by_id(owner_id.to_string())
            .one(&txn)
            .await
            .map_err(db_err)?
            .map(|m| m.total_cents)
            .unwrap_or(0);

        let completed: Vec<i64> = booking::Entity::find()
            .select_only()
            .column(booking::Column::TotalCents)
            .filter(booking::Column::OwnerId.eq(owner_id))
            .filter(booking::Column::Status.eq(BookingStatus::Completed.as_str()))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(ReconciliationReport {
            owner_id: owner_id.to_string(),
            stored: from_cents(stored_cents),
            computed: from_cents(completed.iter().sum()),
            completed_bookings: completed.len() as u64,
        })
    }
}

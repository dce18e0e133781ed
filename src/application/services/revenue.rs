//! Owner revenue view
//!
//! Totals are only ever written by booking transitions (see
//! `BookingLifecycle`); this service reads them and checks them against
//! the completed bookings they are supposed to summarize.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{DomainResult, ReconciliationReport, RepositoryProvider, RevenueTotal};

pub struct RevenueAggregator {
    repos: Arc<dyn RepositoryProvider>,
}

impl RevenueAggregator {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Stored running total; zero for owners with no completed booking yet.
    pub async fn total_for(&self, owner_id: &str) -> DomainResult<RevenueTotal> {
        Ok(self
            .repos
            .revenue()
            .find_total(owner_id)
            .await?
            .unwrap_or_else(|| RevenueTotal::zero(owner_id)))
    }

    pub async fn totals(&self) -> DomainResult<Vec<RevenueTotal>> {
        self.repos.revenue().find_all().await
    }

    pub async fn reconcile(&self, owner_id: &str) -> DomainResult<ReconciliationReport> {
        let report = self.repos.revenue().reconcile(owner_id).await?;
        if !report.is_consistent() {
            warn!(
                owner_id,
                stored = %report.stored,
                computed = %report.computed,
                drift = %report.drift(),
                "Revenue total drifted from completed bookings"
            );
        }
        Ok(report)
    }

    pub async fn reconcile_all(&self) -> DomainResult<Vec<ReconciliationReport>> {
        let owners = self.repos.revenue().known_owners().await?;
        let mut reports = Vec::with_capacity(owners.len());
        for owner_id in owners {
            reports.push(self.reconcile(&owner_id).await?);
        }
        let drifted = reports.iter().filter(|r| !r.is_consistent()).count();
        info!(owners = reports.len(), drifted, "Revenue reconciliation finished");
        Ok(reports)
    }
}

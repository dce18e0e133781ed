//! Slot generation
//!
//! Carves a charger's day into fixed units and persists them with
//! insert-if-absent semantics, so generation can be repeated and can race
//! with itself or with booking attempts without coordination.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{DomainResult, RepositoryProvider, Slot, SlotSchedule};

pub struct SlotCatalog {
    repos: Arc<dyn RepositoryProvider>,
    schedule: SlotSchedule,
}

impl SlotCatalog {
    pub fn new(repos: Arc<dyn RepositoryProvider>, schedule: SlotSchedule) -> Self {
        Self { repos, schedule }
    }

    pub fn schedule(&self) -> &SlotSchedule {
        &self.schedule
    }

    /// Persist the day's units for a charger. Idempotent; returns how many
    /// units were new.
    pub async fn generate(&self, charger_id: &str, date: NaiveDate) -> DomainResult<u64> {
        let units = self.schedule.units_for(charger_id, date);
        let inserted = self.repos.slots().insert_missing(units).await?;
        if inserted > 0 {
            metrics::counter!("slots_generated_total").increment(inserted);
            debug!(charger_id, %date, inserted, "Generated slots");
        }
        Ok(inserted)
    }

    /// The day's slots, generating them first if none exist yet.
    pub async fn slots_for_day(&self, charger_id: &str, date: NaiveDate) -> DomainResult<Vec<Slot>> {
        let slots = self.repos.slots().find_for_day(charger_id, date).await?;
        if !slots.is_empty() {
            return Ok(slots);
        }
        self.generate(charger_id, date).await?;
        self.repos.slots().find_for_day(charger_id, date).await
    }
}

//! Slot repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::Slot;
use crate::domain::DomainResult;

#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert slots, skipping any `(charger, date, start)` already present.
    /// Returns how many rows were new.
    async fn insert_missing(&self, slots: Vec<Slot>) -> DomainResult<u64>;

    /// Slots of a charger on one day, ordered by start time
    async fn find_for_day(&self, charger_id: &str, date: NaiveDate) -> DomainResult<Vec<Slot>>;
}

//! Charger repository interface

use async_trait::async_trait;

use super::model::Charger;
use crate::domain::DomainResult;

#[async_trait]
pub trait ChargerRepository: Send + Sync {
    /// Find charger by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Charger>>;

    /// All chargers belonging to an owner
    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Charger>>;

    /// Insert or replace a catalog entry (used by catalog sync)
    async fn save(&self, charger: Charger) -> DomainResult<()>;
}

//! SeaORM implementation of ChargerRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::db_err;
use crate::domain::charger::{Charger, ChargerRepository};
use crate::domain::money::{from_cents, to_cents};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::charger;

pub struct SeaOrmChargerRepository {
    db: DatabaseConnection,
}

impl SeaOrmChargerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: charger::Model) -> Charger {
    Charger {
        id: m.id,
        owner_id: m.owner_id,
        price_per_hour: from_cents(m.price_per_hour_cents),
        is_active: m.is_active,
    }
}

#[async_trait]
impl ChargerRepository for SeaOrmChargerRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Charger>> {
        let model = charger::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_owner(&self, owner_id: &str) -> DomainResult<Vec<Charger>> {
        let models = charger::Entity::find()
            .filter(charger::Column::OwnerId.eq(owner_id))
            .order_by_asc(charger::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn save(&self, c: Charger) -> DomainResult<()> {
        debug!("Saving charger: {}", c.id);

        let model = charger::ActiveModel {
            id: Set(c.id),
            owner_id: Set(c.owner_id),
            price_per_hour_cents: Set(to_cents(c.price_per_hour)?),
            is_active: Set(c.is_active),
            created_at: Set(Utc::now()),
        };
        charger::Entity::insert(model)
            .on_conflict(
                OnConflict::column(charger::Column::Id)
                    .update_columns([
                        charger::Column::OwnerId,
                        charger::Column::PricePerHourCents,
                        charger::Column::IsActive,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

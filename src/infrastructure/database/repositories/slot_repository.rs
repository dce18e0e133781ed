//! SeaORM implementation of SlotRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::db_err;
use crate::domain::booking::TimeWindow;
use crate::domain::slot::{Slot, SlotRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::slot;

pub struct SeaOrmSlotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSlotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: slot::Model) -> Slot {
    Slot {
        charger_id: m.charger_id,
        slot_date: m.slot_date,
        window: TimeWindow {
            start: m.start_time,
            end: m.end_time,
        },
    }
}

#[async_trait]
impl SlotRepository for SeaOrmSlotRepository {
    async fn insert_missing(&self, slots: Vec<Slot>) -> DomainResult<u64> {
        if slots.is_empty() {
            return Ok(0);
        }

        let models = slots.into_iter().map(|s| slot::ActiveModel {
            charger_id: Set(s.charger_id),
            slot_date: Set(s.slot_date),
            start_time: Set(s.window.start),
            end_time: Set(s.window.end),
            ..Default::default()
        });

        slot::Entity::insert_many(models)
            .on_conflict(
                OnConflict::columns([
                    slot::Column::ChargerId,
                    slot::Column::SlotDate,
                    slot::Column::StartTime,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_for_day(&self, charger_id: &str, date: NaiveDate) -> DomainResult<Vec<Slot>> {
        let models = slot::Entity::find()
            .filter(slot::Column::ChargerId.eq(charger_id))
            .filter(slot::Column::SlotDate.eq(date))
            .order_by_asc(slot::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}

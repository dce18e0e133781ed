//! Per-charger guard row
//!
//! Every booking attempt bumps its charger's row first, so concurrent
//! attempts on one charger queue up on that row's write lock.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_guards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub charger_id: String,

    pub version: i64,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

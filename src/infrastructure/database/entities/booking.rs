//! Booking entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub charger_id: String,
    /// Charger owner at creation; revenue attribution follows this
    pub owner_id: String,
    pub requester_id: String,
    pub booking_date: Date,
    pub start_time: Time,
    pub end_time: Time,

    /// Price fixed at creation, in cents
    pub total_cents: i64,

    /// pending, confirmed, completed, cancelled
    pub status: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::charger::Entity",
        from = "Column::ChargerId",
        to = "super::charger::Column::Id"
    )]
    Charger,
    #[sea_orm(has_one = "super::payment::Entity")]
    Payment,
    #[sea_orm(has_many = "super::booking_event::Entity")]
    Events,
}

impl Related<super::charger::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charger.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl Related<super::booking_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

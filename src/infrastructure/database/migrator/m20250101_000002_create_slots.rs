//! Create slots table
//!
//! One row per generated unit; `(charger_id, slot_date, start_time)` is
//! unique so regeneration is a no-op.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_chargers::Chargers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Slots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Slots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Slots::ChargerId).string().not_null())
                    .col(ColumnDef::new(Slots::SlotDate).date().not_null())
                    .col(ColumnDef::new(Slots::StartTime).time().not_null())
                    .col(ColumnDef::new(Slots::EndTime).time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_slots_charger")
                            .from(Slots::Table, Slots::ChargerId)
                            .to(Chargers::Table, Chargers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_slots_charger_date_start")
                    .table(Slots::Table)
                    .col(Slots::ChargerId)
                    .col(Slots::SlotDate)
                    .col(Slots::StartTime)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Slots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Slots {
    Table,
    Id,
    ChargerId,
    SlotDate,
    StartTime,
    EndTime,
}

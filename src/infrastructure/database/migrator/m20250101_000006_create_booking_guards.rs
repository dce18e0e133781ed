//! Create booking_guards table
//!
//! One row per charger, bumped at the start of every booking transaction.

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
                    .table(BookingGuards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingGuards::ChargerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BookingGuards::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BookingGuards::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_guards_charger")
                            .from(BookingGuards::Table, BookingGuards::ChargerId)
                            .to(Chargers::Table, Chargers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingGuards::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookingGuards {
    Table,
    ChargerId,
    Version,
    UpdatedAt,
}

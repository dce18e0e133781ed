//! Create bookings table

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
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::ChargerId).string().not_null())
                    .col(ColumnDef::new(Bookings::OwnerId).string().not_null())
                    .col(ColumnDef::new(Bookings::RequesterId).string().not_null())
                    .col(ColumnDef::new(Bookings::BookingDate).date().not_null())
                    .col(ColumnDef::new(Bookings::StartTime).time().not_null())
                    .col(ColumnDef::new(Bookings::EndTime).time().not_null())
                    .col(
                        ColumnDef::new(Bookings::TotalCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_charger")
                            .from(Bookings::Table, Bookings::ChargerId)
                            .to(Chargers::Table, Chargers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_charger_date")
                    .table(Bookings::Table)
                    .col(Bookings::ChargerId)
                    .col(Bookings::BookingDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_requester")
                    .table(Bookings::Table)
                    .col(Bookings::RequesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_owner_status")
                    .table(Bookings::Table)
                    .col(Bookings::OwnerId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    ChargerId,
    OwnerId,
    RequesterId,
    BookingDate,
    StartTime,
    EndTime,
    TotalCents,
    Status,
    CreatedAt,
    UpdatedAt,
}

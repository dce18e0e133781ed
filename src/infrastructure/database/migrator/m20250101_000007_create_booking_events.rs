//! Create booking_events table (status audit trail)

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookingEvents::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookingEvents::BookingId).string().not_null())
                    .col(ColumnDef::new(BookingEvents::FromStatus).string_len(20))
                    .col(
                        ColumnDef::new(BookingEvents::ToStatus)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(BookingEvents::ActorId).string())
                    .col(
                        ColumnDef::new(BookingEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_events_booking")
                            .from(BookingEvents::Table, BookingEvents::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_events_booking")
                    .table(BookingEvents::Table)
                    .col(BookingEvents::BookingId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BookingEvents {
    Table,
    Id,
    BookingId,
    FromStatus,
    ToStatus,
    ActorId,
    CreatedAt,
}

//! Create chargers table
//!
//! Local mirror of the station catalog: owner, hourly rate, active flag.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chargers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chargers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chargers::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Chargers::PricePerHourCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Chargers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Chargers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chargers_owner")
                    .table(Chargers::Table)
                    .col(Chargers::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chargers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Chargers {
    Table,
    Id,
    OwnerId,
    PricePerHourCents,
    IsActive,
    CreatedAt,
}

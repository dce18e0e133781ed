//! Create owner_revenue table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OwnerRevenue::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OwnerRevenue::OwnerId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OwnerRevenue::TotalCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OwnerRevenue::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OwnerRevenue::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum OwnerRevenue {
    Table,
    OwnerId,
    TotalCents,
    UpdatedAt,
}

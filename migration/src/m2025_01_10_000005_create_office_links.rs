//! Commercial board. Same shape as the residential `links` table; the two
//! boards are intentionally kept as separate tables so per-customer counters
//! and listings never cross over.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfficeLinks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OfficeLinks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OfficeLinks::Url).text().not_null())
                    .col(ColumnDef::new(OfficeLinks::Platform).text().not_null())
                    .col(ColumnDef::new(OfficeLinks::AddedBy).text().not_null().default(""))
                    .col(ColumnDef::new(OfficeLinks::DateAdded).text().not_null())
                    .col(ColumnDef::new(OfficeLinks::Rating).integer().not_null().default(5))
                    .col(ColumnDef::new(OfficeLinks::Liked).boolean().not_null().default(false))
                    .col(ColumnDef::new(OfficeLinks::Disliked).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(OfficeLinks::GuaranteeInsurance)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OfficeLinks::IsChecked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OfficeLinks::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(OfficeLinks::Memo).text().not_null().default(""))
                    .col(ColumnDef::new(OfficeLinks::ManagementSiteId).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_office_links_management_site_id")
                    .table(OfficeLinks::Table)
                    .col(OfficeLinks::ManagementSiteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OfficeLinks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OfficeLinks {
    Table,
    Id,
    Url,
    Platform,
    AddedBy,
    DateAdded,
    Rating,
    Liked,
    Disliked,
    GuaranteeInsurance,
    IsChecked,
    IsDeleted,
    Memo,
    ManagementSiteId,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Links::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Links::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Links::Url).text().not_null())
                    .col(ColumnDef::new(Links::Platform).text().not_null())
                    .col(ColumnDef::new(Links::AddedBy).text().not_null().default(""))
                    .col(ColumnDef::new(Links::DateAdded).text().not_null())
                    .col(ColumnDef::new(Links::Rating).integer().not_null().default(5))
                    .col(ColumnDef::new(Links::Liked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Links::Disliked).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Links::GuaranteeInsurance)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Links::IsChecked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Links::IsDeleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(Links::Memo).text().not_null().default(""))
                    .col(ColumnDef::new(Links::ManagementSiteId).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_management_site_id")
                    .table(Links::Table)
                    .col(Links::ManagementSiteId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Links {
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

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuaranteeInsuranceLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuaranteeInsuranceLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GuaranteeInsuranceLog::ManagementSiteId)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(GuaranteeInsuranceLog::LinkId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GuaranteeInsuranceLog::ClickTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(GuaranteeInsuranceLog::UserIp).text().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GuaranteeInsuranceLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GuaranteeInsuranceLog {
    Table,
    Id,
    ManagementSiteId,
    LinkId,
    ClickTime,
    UserIp,
}

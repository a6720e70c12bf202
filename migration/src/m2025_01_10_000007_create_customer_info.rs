use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomerInfo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerInfo::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerInfo::CustomerName)
                            .text()
                            .not_null()
                            .default("제일좋은집 찾아드릴분"),
                    )
                    .col(
                        ColumnDef::new(CustomerInfo::MoveInDate)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerInfo::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CustomerInfo {
    Table,
    Id,
    CustomerName,
    MoveInDate,
}

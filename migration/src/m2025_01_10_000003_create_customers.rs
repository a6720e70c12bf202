//! Migration to create the employee_customers table.
//!
//! `management_site_id` is the opaque bearer handle for the customer's paired
//! link boards; it is unique across the table and the join key for both board
//! tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmployeeCustomers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeCustomers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::ManagementSiteId)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(EmployeeCustomers::CustomerName).text().not_null())
                    .col(ColumnDef::new(EmployeeCustomers::CustomerPhone).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::InquiryDate).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::MoveInDate).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::Budget).big_integer().null())
                    .col(ColumnDef::new(EmployeeCustomers::Rooms).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::Location).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::LoanNeeded).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::ParkingNeeded).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::Pets).text().null())
                    .col(ColumnDef::new(EmployeeCustomers::Memo).text().null())
                    .col(
                        ColumnDef::new(EmployeeCustomers::ProgressStatus)
                            .text()
                            .not_null()
                            .default("진행중"),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::EmployeeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::EmployeeName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::EmployeeTeam)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::CreatedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::UpdatedDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::UncheckedLikesResidence)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmployeeCustomers::UncheckedLikesBusiness)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_employee_customers_employee_id")
                    .table(EmployeeCustomers::Table)
                    .col(EmployeeCustomers::EmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmployeeCustomers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EmployeeCustomers {
    Table,
    Id,
    ManagementSiteId,
    CustomerName,
    CustomerPhone,
    InquiryDate,
    MoveInDate,
    Budget,
    Rooms,
    Location,
    LoanNeeded,
    ParkingNeeded,
    Pets,
    Memo,
    ProgressStatus,
    EmployeeId,
    EmployeeName,
    EmployeeTeam,
    CreatedDate,
    UpdatedDate,
    UncheckedLikesResidence,
    UncheckedLikesBusiness,
}

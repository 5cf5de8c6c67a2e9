//! Migration: Create fee, ledger, expense and payroll tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeeStructures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeStructures::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeeStructures::ClassName).string().not_null())
                    .col(ColumnDef::new(FeeStructures::Name).string().not_null())
                    .col(ColumnDef::new(FeeStructures::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeeStructures::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeStructures::Status).string().not_null())
                    .col(
                        ColumnDef::new(FeeStructures::PublishedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeePayments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeePayments::StudentId).uuid().not_null())
                    .col(ColumnDef::new(FeePayments::Amount).big_integer().not_null())
                    .col(ColumnDef::new(FeePayments::Method).string().not_null())
                    .col(ColumnDef::new(FeePayments::Reference).string().null())
                    .col(ColumnDef::new(FeePayments::Note).string().null())
                    .col(ColumnDef::new(FeePayments::ReceivedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(FeePayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fee_payments_student_id")
                            .from(FeePayments::Table, FeePayments::StudentId)
                            .to(Students::Table, Students::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_payments_student_id")
                    .table(FeePayments::Table)
                    .col(FeePayments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(ColumnDef::new(Accounts::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::TransactionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::AccountId).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::Debit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::Credit)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(JournalEntries::Memo).string().null())
                    .col(ColumnDef::new(JournalEntries::PostedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_account_id")
                            .from(JournalEntries::Table, JournalEntries::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_transaction_id")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_account_id")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExpenseRequests::RequestedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseRequests::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseRequests::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExpenseRequests::Status).string().not_null())
                    .col(ColumnDef::new(ExpenseRequests::DecidedBy).uuid().null())
                    .col(
                        ColumnDef::new(ExpenseRequests::DecidedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PayrollEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PayrollEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PayrollEntries::TeacherId).uuid().not_null())
                    .col(ColumnDef::new(PayrollEntries::Period).string().not_null())
                    .col(
                        ColumnDef::new(PayrollEntries::BaseSalary)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PayrollEntries::Allowances)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PayrollEntries::Deductions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PayrollEntries::NetPay)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PayrollEntries::Status).string().not_null())
                    .col(
                        ColumnDef::new(PayrollEntries::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PayrollEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payroll_entries_teacher_id")
                            .from(PayrollEntries::Table, PayrollEntries::TeacherId)
                            .to(Teachers::Table, Teachers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payroll_teacher_period")
                    .table(PayrollEntries::Table)
                    .col(PayrollEntries::TeacherId)
                    .col(PayrollEntries::Period)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PayrollEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FeeStructures::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum FeeStructures {
    Table,
    Id,
    ClassName,
    Name,
    Amount,
    AcademicYear,
    Status,
    PublishedAt,
    CreatedAt,
}

#[derive(Iden)]
enum FeePayments {
    Table,
    Id,
    StudentId,
    Amount,
    Method,
    Reference,
    Note,
    ReceivedBy,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Code,
    Name,
    Kind,
    Balance,
    CreatedAt,
}

#[derive(Iden)]
enum JournalEntries {
    Table,
    Id,
    TransactionId,
    AccountId,
    Debit,
    Credit,
    Memo,
    PostedBy,
    CreatedAt,
}

#[derive(Iden)]
enum ExpenseRequests {
    Table,
    Id,
    RequestedBy,
    Description,
    Amount,
    Status,
    DecidedBy,
    DecidedAt,
    CreatedAt,
}

#[derive(Iden)]
enum PayrollEntries {
    Table,
    Id,
    TeacherId,
    Period,
    BaseSalary,
    Allowances,
    Deductions,
    NetPay,
    Status,
    PaidAt,
    CreatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
}

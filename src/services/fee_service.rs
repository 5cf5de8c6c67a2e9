//! Fee structures and payments.
//!
//! Publishing a structure levies its amount on every active student of
//! the class; reverting withdraws it again. Both run inside one
//! database transaction, as does payment recording, so student fee
//! totals can never observe a half-applied change.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::is_valid_payment_method;
use crate::domain::{FeePayment, FeeStructure, FeeStructureStatus, Money, SchoolSettings, Student};
use crate::errors::{AppError, AppResult};
use crate::infra::{FeeStructurePatch, NewFeeStructure, UnitOfWork};

/// Everything needed to render a payment receipt.
#[derive(Debug, Serialize)]
pub struct ReceiptData {
    pub payment: FeePayment,
    pub student: Student,
    pub settings: Option<SchoolSettings>,
}

/// Outcome of publishing or reverting a structure.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublishOutcome {
    pub structure: FeeStructure,
    /// Number of students whose totals were adjusted
    pub students_affected: usize,
}

/// Fee service trait for dependency injection.
#[async_trait]
pub trait FeeService: Send + Sync {
    async fn get_structure(&self, id: Uuid) -> AppResult<FeeStructure>;

    async fn list_structures(
        &self,
        class_name: Option<String>,
        academic_year: Option<String>,
    ) -> AppResult<Vec<FeeStructure>>;

    async fn create_structure(&self, new: NewFeeStructure) -> AppResult<FeeStructure>;

    /// Drafts only; published structures are immutable
    async fn update_structure(&self, id: Uuid, patch: FeeStructurePatch)
        -> AppResult<FeeStructure>;

    /// Drafts only
    async fn delete_structure(&self, id: Uuid) -> AppResult<()>;

    /// Levy the structure on all active students of its class
    async fn publish_structure(&self, id: Uuid) -> AppResult<PublishOutcome>;

    /// Withdraw a published structure from all active students of its class
    async fn revert_structure(&self, id: Uuid) -> AppResult<PublishOutcome>;

    /// Record a payment and update the student's totals atomically
    async fn record_payment(
        &self,
        student_id: Uuid,
        amount: Money,
        method: String,
        reference: Option<String>,
        note: Option<String>,
        received_by: Uuid,
    ) -> AppResult<FeePayment>;

    async fn payments_for_student(&self, student_id: Uuid) -> AppResult<Vec<FeePayment>>;

    /// Data for rendering one payment's receipt
    async fn receipt(&self, payment_id: Uuid) -> AppResult<ReceiptData>;
}

/// Concrete implementation of FeeService using Unit of Work.
pub struct FeeManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FeeManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> FeeService for FeeManager<U> {
    async fn get_structure(&self, id: Uuid) -> AppResult<FeeStructure> {
        self.uow
            .fees()
            .find_structure(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_structures(
        &self,
        class_name: Option<String>,
        academic_year: Option<String>,
    ) -> AppResult<Vec<FeeStructure>> {
        self.uow.fees().list_structures(class_name, academic_year).await
    }

    async fn create_structure(&self, new: NewFeeStructure) -> AppResult<FeeStructure> {
        if new.amount <= 0 {
            return Err(AppError::validation("amount must be positive"));
        }

        self.uow.fees().create_structure(new).await
    }

    async fn update_structure(
        &self,
        id: Uuid,
        patch: FeeStructurePatch,
    ) -> AppResult<FeeStructure> {
        let structure = self.get_structure(id).await?;
        if structure.is_published() {
            return Err(AppError::validation(
                "Published structures cannot be edited; revert it first",
            ));
        }
        if patch.amount.is_some_and(|a| a <= 0) {
            return Err(AppError::validation("amount must be positive"));
        }

        self.uow.fees().update_structure(id, patch).await
    }

    async fn delete_structure(&self, id: Uuid) -> AppResult<()> {
        let structure = self.get_structure(id).await?;
        if structure.is_published() {
            return Err(AppError::validation(
                "Published structures cannot be deleted; revert it first",
            ));
        }

        self.uow.fees().delete_structure(id).await
    }

    async fn publish_structure(&self, id: Uuid) -> AppResult<PublishOutcome> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let structure = ctx
                        .fees()
                        .find_structure(id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    if structure.is_published() {
                        return Err(AppError::validation("Structure is already published"));
                    }

                    let students = ctx.students().list_active_by_class(&structure.class_name).await?;
                    let students_affected = students.len();
                    for student in students {
                        let total =
                            student.total_fees.checked_add(structure.amount).ok_or_else(|| {
                                AppError::validation(format!(
                                    "Publishing would overflow the fee total of student {}",
                                    student.admission_no
                                ))
                            })?;
                        ctx.students()
                            .set_fee_totals(student.id, total, student.paid_fees)
                            .await?;
                    }

                    let structure = ctx
                        .fees()
                        .set_structure_status(id, FeeStructureStatus::Published)
                        .await?;

                    tracing::info!(
                        structure_id = %id,
                        students_affected,
                        "fee structure published"
                    );

                    Ok(PublishOutcome {
                        structure,
                        students_affected,
                    })
                })
            })
            .await
    }

    async fn revert_structure(&self, id: Uuid) -> AppResult<PublishOutcome> {
        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let structure = ctx
                        .fees()
                        .find_structure(id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    if !structure.is_published() {
                        return Err(AppError::validation("Structure is not published"));
                    }

                    let students = ctx.students().list_active_by_class(&structure.class_name).await?;
                    let students_affected = students.len();
                    for student in students {
                        // Never drives a total below zero, even if the levy
                        // was never applied to this student.
                        let total = student.total_fees.saturating_sub(structure.amount).max(0);
                        ctx.students()
                            .set_fee_totals(student.id, total, student.paid_fees)
                            .await?;
                    }

                    let structure = ctx
                        .fees()
                        .set_structure_status(id, FeeStructureStatus::Draft)
                        .await?;

                    tracing::info!(
                        structure_id = %id,
                        students_affected,
                        "fee structure reverted"
                    );

                    Ok(PublishOutcome {
                        structure,
                        students_affected,
                    })
                })
            })
            .await
    }

    async fn record_payment(
        &self,
        student_id: Uuid,
        amount: Money,
        method: String,
        reference: Option<String>,
        note: Option<String>,
        received_by: Uuid,
    ) -> AppResult<FeePayment> {
        if amount <= 0 {
            return Err(AppError::validation("amount must be positive"));
        }
        if !is_valid_payment_method(&method) {
            return Err(AppError::validation(format!(
                "Unknown payment method: {}",
                method
            )));
        }

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let student = ctx
                        .students()
                        .find_by_id(student_id)
                        .await?
                        .ok_or(AppError::NotFound)?;

                    if amount > student.fee_balance {
                        return Err(AppError::validation(format!(
                            "Payment of {} exceeds outstanding balance of {}",
                            amount, student.fee_balance
                        )));
                    }

                    let payment = ctx
                        .fees()
                        .insert_payment(student_id, amount, method, reference, note, received_by)
                        .await?;

                    let paid = student.paid_fees.checked_add(amount).ok_or_else(|| {
                        AppError::validation("Payment would overflow the student's paid total")
                    })?;
                    ctx.students()
                        .set_fee_totals(student_id, student.total_fees, paid)
                        .await?;

                    Ok(payment)
                })
            })
            .await
    }

    async fn payments_for_student(&self, student_id: Uuid) -> AppResult<Vec<FeePayment>> {
        self.uow
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.uow.fees().payments_for_student(student_id).await
    }

    async fn receipt(&self, payment_id: Uuid) -> AppResult<ReceiptData> {
        let payment = self
            .uow
            .fees()
            .find_payment(payment_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let student = self
            .uow
            .students()
            .find_by_id(payment.student_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let settings = self.uow.settings().get().await?;

        Ok(ReceiptData {
            payment,
            student,
            settings,
        })
    }
}

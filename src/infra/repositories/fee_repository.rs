//! Fee structure and payment repository.
//!
//! Payment inserts and the publish/revert flows go through the Unit of
//! Work transaction context; this repository covers the read side and
//! draft-structure maintenance.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::fee_payment::Entity as PaymentEntity;
use super::entities::fee_structure::{
    self, ActiveModel as StructureActiveModel, Entity as StructureEntity,
};
use super::entities::fee_payment;
use crate::domain::{FeePayment, FeeStructure, FeeStructureStatus, Money};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Fields for creating a fee structure (always created as draft)
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeeStructure {
    pub class_name: String,
    pub name: String,
    pub amount: Money,
    pub academic_year: String,
}

/// Partial update; only drafts are editable (enforced in the service)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeStructurePatch {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub academic_year: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeeRepository: Send + Sync {
    async fn find_structure(&self, id: Uuid) -> AppResult<Option<FeeStructure>>;

    async fn list_structures(
        &self,
        class_name: Option<String>,
        academic_year: Option<String>,
    ) -> AppResult<Vec<FeeStructure>>;

    async fn create_structure(&self, new: NewFeeStructure) -> AppResult<FeeStructure>;

    async fn update_structure(&self, id: Uuid, patch: FeeStructurePatch)
        -> AppResult<FeeStructure>;

    /// Hard delete a structure (service allows drafts only)
    async fn delete_structure(&self, id: Uuid) -> AppResult<()>;

    async fn find_payment(&self, id: Uuid) -> AppResult<Option<FeePayment>>;

    async fn payments_for_student(&self, student_id: Uuid) -> AppResult<Vec<FeePayment>>;

    /// Sum of all recorded payments for one student
    async fn total_paid_for_student(&self, student_id: Uuid) -> AppResult<Money>;
}

/// Concrete implementation of FeeRepository
pub struct FeeStore {
    db: DatabaseConnection,
}

impl FeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeeRepository for FeeStore {
    async fn find_structure(&self, id: Uuid) -> AppResult<Option<FeeStructure>> {
        let result = StructureEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(FeeStructure::from))
    }

    async fn list_structures(
        &self,
        class_name: Option<String>,
        academic_year: Option<String>,
    ) -> AppResult<Vec<FeeStructure>> {
        let mut query = StructureEntity::find();
        if let Some(class_name) = class_name {
            query = query.filter(fee_structure::Column::ClassName.eq(class_name));
        }
        if let Some(academic_year) = academic_year {
            query = query.filter(fee_structure::Column::AcademicYear.eq(academic_year));
        }

        let models = query
            .order_by_desc(fee_structure::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(FeeStructure::from).collect())
    }

    async fn create_structure(&self, new: NewFeeStructure) -> AppResult<FeeStructure> {
        let active = StructureActiveModel {
            id: Set(Uuid::new_v4()),
            class_name: Set(new.class_name),
            name: Set(new.name),
            amount: Set(new.amount),
            academic_year: Set(new.academic_year),
            status: Set(FeeStructureStatus::Draft.to_string()),
            published_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(FeeStructure::from(model))
    }

    async fn update_structure(
        &self,
        id: Uuid,
        patch: FeeStructurePatch,
    ) -> AppResult<FeeStructure> {
        let model = StructureEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: StructureActiveModel = model.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(academic_year) = patch.academic_year {
            active.academic_year = Set(academic_year);
        }

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(FeeStructure::from(model))
    }

    async fn delete_structure(&self, id: Uuid) -> AppResult<()> {
        let result = StructureEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn find_payment(&self, id: Uuid) -> AppResult<Option<FeePayment>> {
        let result = PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(FeePayment::from))
    }

    async fn payments_for_student(&self, student_id: Uuid) -> AppResult<Vec<FeePayment>> {
        let models = PaymentEntity::find()
            .filter(fee_payment::Column::StudentId.eq(student_id))
            .order_by_desc(fee_payment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(FeePayment::from).collect())
    }

    async fn total_paid_for_student(&self, student_id: Uuid) -> AppResult<Money> {
        let payments = self.payments_for_student(student_id).await?;
        Ok(payments.iter().map(|p| p.amount).sum())
    }
}

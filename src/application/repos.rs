//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use crate::domain::booking::ReservationPeriod;
use crate::domain::entities::{ImageRecord, ProductRecord, ReservationRecord};
use crate::domain::error::DomainError;
use crate::domain::types::{ApprovalState, LinkedTableType};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// A validated reservation ready for commit. Constructed only through
/// [`NewReservation::new`], which rejects inverted date ranges.
#[derive(Debug, Clone, Copy)]
pub struct NewReservation {
    pub id: Uuid,
    pub product_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub approval_state: ApprovalState,
}

impl NewReservation {
    pub fn new(
        product_id: i32,
        start_date: Date,
        end_date: Date,
        approval_state: ApprovalState,
    ) -> Result<Self, DomainError> {
        if end_date < start_date {
            return Err(DomainError::invariant(format!(
                "reservation range inverted: {start_date} > {end_date}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            start_date,
            end_date,
            approval_state,
        })
    }

    pub fn period(&self) -> ReservationPeriod {
        ReservationPeriod {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[async_trait]
pub trait ReservationsRepo: Send + Sync {
    async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, RepoError>;

    /// Whether any stored reservation intersects the half-open period.
    async fn overlap_exists(&self, period: &ReservationPeriod) -> Result<bool, RepoError>;

    /// Persist the whole batch in one transaction; either every row lands or
    /// none do.
    async fn append_reservations(
        &self,
        reservations: &[NewReservation],
    ) -> Result<Vec<ReservationRecord>, RepoError>;
}

#[derive(Debug, Clone)]
pub struct NewImage {
    pub linked_key: i32,
    pub linked_table_type: LinkedTableType,
    pub blob: Vec<u8>,
}

#[async_trait]
pub trait ImagesRepo: Send + Sync {
    async fn insert_images(&self, images: &[NewImage]) -> Result<Vec<ImageRecord>, RepoError>;

    async fn list_for_entity(
        &self,
        linked_table_type: LinkedTableType,
        linked_key: i32,
    ) -> Result<Vec<ImageRecord>, RepoError>;
}

#[derive(Debug, Clone, Copy)]
pub struct ProductPageRequest {
    pub limit: u32,
    pub offset: u64,
}

#[async_trait]
pub trait ProductsRepo: Send + Sync {
    async fn list_products(&self, page: ProductPageRequest)
    -> Result<Vec<ProductRecord>, RepoError>;

    async fn count_products(&self) -> Result<u64, RepoError>;

    async fn find_product(&self, id: i32) -> Result<Option<ProductRecord>, RepoError>;
}

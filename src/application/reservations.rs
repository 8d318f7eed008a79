//! Reservation admission: batch validation followed by an all-or-nothing
//! commit.

use std::sync::Arc;

use futures::{StreamExt, stream};
use metrics::counter;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::info;

use crate::application::directory::{DirectoryLookup, ProductDirectory};
use crate::application::repos::{NewReservation, RepoError, ReservationsRepo};
use crate::domain::booking::{BookingRequest, booking_rule_errors};
use crate::domain::entities::ReservationRecord;
use crate::domain::error::DomainError;
use crate::domain::types::{ApprovalState, ProductState, ReserveErrorCode};

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("reservation batch contained no items")]
    EmptyBatch,
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// One admission failure, tied to the batch item that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingError {
    pub index: usize,
    pub key: BookingRequest,
    pub value: ReserveErrorCode,
}

/// Result of validating a batch without committing it.
#[derive(Debug)]
pub struct BatchValidation {
    pub errors: Vec<BookingError>,
    pub accepted: Vec<NewReservation>,
}

/// Final outcome of an admission run.
#[derive(Debug)]
pub enum BatchOutcome {
    Committed(Vec<ReservationRecord>),
    Rejected(Vec<BookingError>),
}

#[derive(Clone)]
pub struct ReservationService {
    reservations: Arc<dyn ReservationsRepo>,
    directory: Arc<dyn ProductDirectory>,
    lookup_concurrency: usize,
    // Serializes overlap checks against commits so two concurrent batches
    // cannot both pass validation and double-book the same period.
    admission: Arc<Mutex<()>>,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationsRepo>,
        directory: Arc<dyn ProductDirectory>,
        lookup_concurrency: usize,
    ) -> Self {
        Self {
            reservations,
            directory,
            lookup_concurrency: lookup_concurrency.max(1),
            admission: Arc::new(Mutex::new(())),
        }
    }

    pub async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, ReservationError> {
        self.reservations
            .list_reservations()
            .await
            .map_err(ReservationError::from)
    }

    /// Admit a batch: validate every item, then commit all of them or none.
    pub async fn reserve_products(
        &self,
        requests: &[BookingRequest],
    ) -> Result<BatchOutcome, ReservationError> {
        if requests.is_empty() {
            return Err(ReservationError::EmptyBatch);
        }

        let _admission = self.admission.lock().await;
        let today = OffsetDateTime::now_utc().date();
        let validation = self.validate_batch(requests, today).await?;

        if !validation.errors.is_empty() {
            counter!("prenota_reservations_rejected_total")
                .increment(validation.errors.len() as u64);
            info!(
                items = requests.len(),
                errors = validation.errors.len(),
                "reservation batch rejected"
            );
            return Ok(BatchOutcome::Rejected(validation.errors));
        }

        let records = self
            .reservations
            .append_reservations(&validation.accepted)
            .await?;
        counter!("prenota_reservations_admitted_total").increment(records.len() as u64);
        info!(items = records.len(), "reservation batch committed");
        Ok(BatchOutcome::Committed(records))
    }

    /// Run every admission rule over the batch, accumulating all failures.
    ///
    /// Directory snapshots are prefetched concurrently in request order;
    /// everything after that is sequential so stored error order stays
    /// deterministic. A batch with any failing item accepts nothing.
    pub async fn validate_batch(
        &self,
        requests: &[BookingRequest],
        today: Date,
    ) -> Result<BatchValidation, ReservationError> {
        let fetches: Vec<_> = requests
            .iter()
            .map(|request| self.directory.fetch(request.product_id))
            .collect();
        let lookups: Vec<DirectoryLookup> = stream::iter(fetches)
            .buffered(self.lookup_concurrency)
            .collect()
            .await;

        let mut errors = Vec::new();
        let mut accepted = Vec::new();

        for (index, (request, lookup)) in requests.iter().zip(lookups).enumerate() {
            let mut codes = booking_rule_errors(request, today);

            if self.reservations.overlap_exists(&request.period()).await? {
                codes.push(ReserveErrorCode::AlreadyReservedInPeriod);
            }

            let approval_state = match lookup {
                DirectoryLookup::NotFound => {
                    codes.push(ReserveErrorCode::ProductNotFound);
                    None
                }
                DirectoryLookup::Found(snapshot) => {
                    if snapshot.state != ProductState::Available {
                        codes.push(ReserveErrorCode::ProductNotAvailable);
                        None
                    } else {
                        Some(ApprovalState::from_requires_approval(
                            snapshot.requires_approval,
                        ))
                    }
                }
            };

            if codes.is_empty() {
                if let Some(approval_state) = approval_state {
                    accepted.push(NewReservation::new(
                        request.product_id,
                        request.start_date,
                        request.end_date,
                        approval_state,
                    )?);
                }
            } else {
                errors.extend(codes.into_iter().map(|code| BookingError {
                    index,
                    key: *request,
                    value: code,
                }));
            }
        }

        if !errors.is_empty() {
            accepted.clear();
        }

        Ok(BatchValidation { errors, accepted })
    }
}

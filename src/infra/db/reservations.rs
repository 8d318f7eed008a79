use async_trait::async_trait;
use sqlx::query_scalar;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::application::repos::{NewReservation, RepoError, ReservationsRepo};
use crate::domain::booking::ReservationPeriod;
use crate::domain::entities::ReservationRecord;
use crate::domain::types::ApprovalState;

use super::{PostgresRepositories, util::map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    product_id: i32,
    start_date: Date,
    end_date: Date,
    approval_state: ApprovalState,
    created_at: OffsetDateTime,
}

impl From<ReservationRow> for ReservationRecord {
    fn from(row: ReservationRow) -> Self {
        Self {
            id: row.id,
            product_id: row.product_id,
            start_date: row.start_date,
            end_date: row.end_date,
            approval_state: row.approval_state,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ReservationsRepo for PostgresRepositories {
    async fn list_reservations(&self) -> Result<Vec<ReservationRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, product_id, start_date, end_date, approval_state, created_at \
             FROM reservations ORDER BY start_date, created_at",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ReservationRecord::from).collect())
    }

    async fn overlap_exists(&self, period: &ReservationPeriod) -> Result<bool, RepoError> {
        // Half-open comparison: touching end points do not conflict.
        query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reservations \
             WHERE start_date < $2 AND $1 < end_date)",
        )
        .bind(period.start_date)
        .bind(period.end_date)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn append_reservations(
        &self,
        reservations: &[NewReservation],
    ) -> Result<Vec<ReservationRecord>, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;
        let mut inserted = Vec::with_capacity(reservations.len());

        for reservation in reservations {
            let row = sqlx::query_as::<_, ReservationRow>(
                "INSERT INTO reservations (id, product_id, start_date, end_date, approval_state) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING id, product_id, start_date, end_date, approval_state, created_at",
            )
            .bind(reservation.id)
            .bind(reservation.product_id)
            .bind(reservation.start_date)
            .bind(reservation.end_date)
            .bind(reservation.approval_state)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            inserted.push(ReservationRecord::from(row));
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(inserted)
    }
}

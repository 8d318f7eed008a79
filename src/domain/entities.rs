//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{ApprovalState, LinkedTableType, ProductState, date_wire, date_wire_opt};

/// A committed reservation. The date range is immutable after creation; only
/// `approval_state` may transition later, by an external actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRecord {
    pub id: Uuid,
    pub product_id: i32,
    #[serde(with = "date_wire")]
    pub start_date: Date,
    #[serde(with = "date_wire")]
    pub end_date: Date,
    pub approval_state: ApprovalState,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Stored image metadata; the blob itself stays in the database and is never
/// serialized onto the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub id: Uuid,
    pub linked_key: i32,
    pub linked_table_type: LinkedTableType,
    pub size_bytes: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A catalog product row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i32,
    pub catalog_number: i32,
    pub name: String,
    pub description: String,
    pub requires_approval: bool,
    pub status: ProductState,
    pub category: String,
    #[serde(with = "date_wire_opt")]
    pub archived_since: Option<Date>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

//! Wire models for the public HTTP surface.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::domain::booking::BookingRequest;
use crate::domain::types::{LinkedTableType, ReserveErrorCode, date_wire};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveProductsRequest {
    #[serde(default)]
    pub product_models: Option<Vec<ProductModelPayload>>,
}

/// One batch item as submitted by the client; echoed back verbatim as the
/// `key` of each admission failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductModelPayload {
    #[serde(default)]
    pub id: i32,
    #[serde(with = "date_wire")]
    pub start_date: Date,
    #[serde(with = "date_wire")]
    pub end_date: Date,
}

impl From<&ProductModelPayload> for BookingRequest {
    fn from(payload: &ProductModelPayload) -> Self {
        BookingRequest {
            product_id: payload.id,
            start_date: payload.start_date,
            end_date: payload.end_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReserveErrorItem {
    pub key: ProductModelPayload,
    pub value: ReserveErrorCode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveImagesRequest {
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub linked_key: i32,
    pub linked_table_type: LinkedTableType,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProductListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u32>,
}

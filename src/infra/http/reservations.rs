use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::error::ErrorReport;
use crate::application::reservations::{BatchOutcome, ReservationError};
use crate::domain::booking::BookingRequest;
use crate::domain::types::NO_PRODUCTS_CODE;

use super::models::{ProductModelPayload, ReserveErrorItem, ReserveProductsRequest};
use super::{HttpState, repo_error_response};

pub async fn reserve_products(
    State(state): State<HttpState>,
    Json(body): Json<ReserveProductsRequest>,
) -> Response {
    let payloads: Vec<ProductModelPayload> = body.product_models.unwrap_or_default();
    let requests: Vec<BookingRequest> = payloads.iter().map(BookingRequest::from).collect();

    match state.reservations.reserve_products(&requests).await {
        Ok(BatchOutcome::Committed(_)) => StatusCode::OK.into_response(),
        Ok(BatchOutcome::Rejected(errors)) => {
            let items: Vec<ReserveErrorItem> = errors
                .iter()
                .map(|error| ReserveErrorItem {
                    key: payloads[error.index],
                    value: error.value,
                })
                .collect();
            (StatusCode::BAD_REQUEST, Json(items)).into_response()
        }
        Err(ReservationError::EmptyBatch) => {
            let mut response = (StatusCode::BAD_REQUEST, NO_PRODUCTS_CODE).into_response();
            ErrorReport::from_message(
                "infra::http::reserve_products",
                StatusCode::BAD_REQUEST,
                "reservation batch contained no items",
            )
            .attach(&mut response);
            response
        }
        Err(ReservationError::Repo(err)) => {
            repo_error_response("infra::http::reserve_products", &err)
        }
        Err(ReservationError::Domain(err)) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let mut response = (status, "Unexpected error occurred").into_response();
            ErrorReport::from_error("infra::http::reserve_products", status, &err)
                .attach(&mut response);
            response
        }
    }
}

pub async fn list_reservations(State(state): State<HttpState>) -> Response {
    match state.reservations.list_reservations().await {
        Ok(records) => Json(records).into_response(),
        Err(ReservationError::Repo(err)) => {
            repo_error_response("infra::http::list_reservations", &err)
        }
        Err(err) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let mut response = (status, "Unexpected error occurred").into_response();
            ErrorReport::from_error("infra::http::list_reservations", status, &err)
                .attach(&mut response);
            response
        }
    }
}

//! Public HTTP surface: router construction, shared state, and middleware.

mod catalog;
mod images;
mod middleware;
pub mod models;
mod reservations;

use std::sync::Arc;

use axum::{
    Router,
    http::StatusCode,
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use sqlx::Error as SqlxError;

use crate::application::catalog::CatalogService;
use crate::application::error::ErrorReport;
use crate::application::images::ImageService;
use crate::application::repos::RepoError;
use crate::application::reservations::ReservationService;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct HttpState {
    pub reservations: ReservationService,
    pub images: ImageService,
    pub catalog: CatalogService,
    pub db: Arc<PostgresRepositories>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route(
            "/reservations/reserveproducts",
            post(reservations::reserve_products),
        )
        .route("/reservations", get(reservations::list_reservations))
        .route("/images", post(images::save_images))
        .route(
            "/images/{linked_table_type}/{linked_key}",
            get(images::list_images),
        )
        .route("/products", get(catalog::list_products))
        .route("/api/product/{id}", get(catalog::product_snapshot))
        .route("/healthz", get(health))
        .layer(from_fn(middleware::log_responses))
        .layer(from_fn(middleware::set_request_context))
        .with_state(state)
}

async fn health(
    state: axum::extract::State<HttpState>,
) -> Response {
    db_health_response(state.db.health_check().await)
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to an opaque HTTP response with the diagnostic
/// attached for the logging middleware.
pub(crate) fn repo_error_response(source: &'static str, err: &RepoError) -> Response {
    let status = match err {
        RepoError::NotFound => StatusCode::NOT_FOUND,
        RepoError::Integrity { .. } => StatusCode::CONFLICT,
        RepoError::Timeout => StatusCode::SERVICE_UNAVAILABLE,
        RepoError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut response = (status, "Request could not be processed").into_response();
    ErrorReport::from_error(source, status, err).attach(&mut response);
    response
}

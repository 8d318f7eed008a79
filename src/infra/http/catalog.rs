use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::catalog::CatalogError;

use super::models::ProductListQuery;
use super::{HttpState, repo_error_response};

pub async fn list_products(
    State(state): State<HttpState>,
    Query(query): Query<ProductListQuery>,
) -> Response {
    match state
        .catalog
        .list_products(query.page, query.page_size)
        .await
    {
        Ok(page) => Json(page).into_response(),
        Err(CatalogError::Repo(err)) => repo_error_response("infra::http::list_products", &err),
    }
}

pub async fn product_snapshot(
    State(state): State<HttpState>,
    Path(id): Path<i32>,
) -> Response {
    match state.catalog.product_snapshot(id).await {
        Ok(Some(snapshot)) => Json(snapshot).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(CatalogError::Repo(err)) => {
            repo_error_response("infra::http::product_snapshot", &err)
        }
    }
}

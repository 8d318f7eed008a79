use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::error::ErrorReport;
use crate::application::images::{ImageError, SaveImagesCommand};
use crate::domain::types::LinkedTableType;

use super::models::SaveImagesRequest;
use super::{HttpState, repo_error_response};

pub async fn save_images(
    State(state): State<HttpState>,
    Json(body): Json<SaveImagesRequest>,
) -> Response {
    let command = SaveImagesCommand {
        images: body.images,
        linked_key: body.linked_key,
        linked_table_type: body.linked_table_type,
    };

    match state.images.save_images(command).await {
        Ok(records) => (StatusCode::CREATED, Json(records)).into_response(),
        Err(ImageError::Repo(err)) => repo_error_response("infra::http::save_images", &err),
        Err(err) => {
            // wire_code is Some for every non-repo variant
            let code = err.wire_code().unwrap_or("INVALID_IMAGE");
            let mut response = (StatusCode::BAD_REQUEST, code).into_response();
            ErrorReport::from_error("infra::http::save_images", StatusCode::BAD_REQUEST, &err)
                .attach(&mut response);
            response
        }
    }
}

pub async fn list_images(
    State(state): State<HttpState>,
    Path((linked_table_type, linked_key)): Path<(LinkedTableType, i32)>,
) -> Response {
    match state
        .images
        .list_for_entity(linked_table_type, linked_key)
        .await
    {
        Ok(records) => Json(records).into_response(),
        Err(ImageError::Repo(err)) => repo_error_response("infra::http::list_images", &err),
        Err(err) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let mut response = (status, "Unexpected error occurred").into_response();
            ErrorReport::from_error("infra::http::list_images", status, &err)
                .attach(&mut response);
            response
        }
    }
}

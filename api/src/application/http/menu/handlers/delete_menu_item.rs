use axum::extract::{Path, State};
use menulens_core::domain::menu_scan::services::MenuScanService;

use crate::application::http::server::{
    api_entities::{
        api_error::{ApiError, ApiErrorResponse},
        response::Response,
    },
    app_state::AppState,
};

#[utoipa::path(
    delete,
    path = "/items/{filename}",
    tag = "menu",
    summary = "Delete a stored menu photo",
    description = "Removes the photo. Deleting a photo that does not exist also succeeds.",
    params(
        ("filename" = String, Path, description = "Generated filename returned by upload or analyze"),
    ),
    responses(
        (status = 204, description = "Deleted or already absent"),
        (status = 400, description = "Not a generated filename", body = ApiErrorResponse)
    ),
)]
pub async fn delete_menu_item(
    Path(filename): Path<String>,
    State(state): State<AppState>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .delete_menu_scan(filename)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::NoContent)
}

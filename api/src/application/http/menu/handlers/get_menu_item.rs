use axum::extract::{Path, State};
use menulens_core::domain::menu_scan::services::MenuScanService;

use crate::application::http::{
    menu::validators::MenuScanResponse,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/items/{filename}",
    tag = "menu",
    summary = "Get a stored menu photo",
    description = "Returns metadata of a previously uploaded photo. Analyses are not stored.",
    params(
        ("filename" = String, Path, description = "Generated filename returned by upload or analyze"),
    ),
    responses(
        (status = 200, body = MenuScanResponse),
        (status = 400, description = "Not a generated filename", body = ApiErrorResponse),
        (status = 404, description = "No such photo", body = ApiErrorResponse)
    ),
)]
pub async fn get_menu_item(
    Path(filename): Path<String>,
    State(state): State<AppState>,
) -> Result<Response<MenuScanResponse>, ApiError> {
    let scan = state
        .service
        .get_menu_scan(filename)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(scan.into()))
}

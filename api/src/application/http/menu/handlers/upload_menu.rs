use axum::extract::{Multipart, State};
use menulens_core::domain::menu_scan::services::MenuScanService;

use crate::application::http::{
    menu::validators::{MenuImageForm, MenuScanResponse, read_menu_image},
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/upload",
    tag = "menu",
    summary = "Upload a menu photo",
    description = "Validates and stores a menu photo without analyzing it.",
    request_body(content = MenuImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = MenuScanResponse),
        (status = 400, description = "Malformed form or empty file", body = ApiErrorResponse),
        (status = 413, description = "File too large", body = ApiErrorResponse),
        (status = 415, description = "Not a JPEG, PNG or WebP image", body = ApiErrorResponse)
    ),
)]
pub async fn upload_menu(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response<MenuScanResponse>, ApiError> {
    let input = read_menu_image(multipart).await?;

    let scan = state
        .service
        .upload_menu_image(input)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(scan.into()))
}

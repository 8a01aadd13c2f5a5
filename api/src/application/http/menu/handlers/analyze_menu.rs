use axum::extract::{Multipart, Query, State};
use menulens_core::domain::menu_analysis::{
    entities::MenuAnalysisResult, ports::MenuAnalysisService, value_objects::AnalyzeMenuInput,
};
use validator::Validate;

use crate::application::http::{
    menu::validators::{AnalyzeMenuQuery, MenuImageForm, read_menu_image},
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
    path = "/analyze",
    tag = "menu",
    summary = "Analyze a menu photo",
    description = "Stores the photo, asks the configured vision model for the dishes on it and \
                   returns them in menu order with dietary classification, meat flags and allergens. \
                   Dish images are attached when an image provider is configured.",
    params(AnalyzeMenuQuery),
    request_body(content = MenuImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Analysis result", body = MenuAnalysisResult),
        (status = 400, description = "Invalid upload or query", body = ApiErrorResponse),
        (status = 413, description = "File too large", body = ApiErrorResponse),
        (status = 415, description = "Unsupported image type", body = ApiErrorResponse),
        (status = 502, description = "Vision provider unavailable or timed out", body = ApiErrorResponse),
        (status = 503, description = "Vision provider rejected the request", body = ApiErrorResponse)
    ),
)]
pub async fn analyze_menu(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeMenuQuery>,
    multipart: Multipart,
) -> Result<Response<MenuAnalysisResult>, ApiError> {
    query.validate()?;
    let upload = read_menu_image(multipart).await?;

    let result = state
        .service
        .analyze_menu(AnalyzeMenuInput {
            upload,
            enrich: query.enrich,
            cuisine_hint: query.cuisine,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(result))
}

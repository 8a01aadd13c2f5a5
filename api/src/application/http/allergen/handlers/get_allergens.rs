use axum::extract::State;
use menulens_core::domain::allergen::{entities::AllergenInfo, services::AllergenService};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/allergens",
    tag = "allergen",
    summary = "List recognised allergens",
    responses(
        (status = 200, body = Vec<AllergenInfo>)
    ),
)]
pub async fn get_allergens(
    State(state): State<AppState>,
) -> Result<Response<Vec<AllergenInfo>>, ApiError> {
    Ok(Response::OK(state.service.list_allergens()))
}

use axum::extract::State;
use menulens_core::domain::health::{entities::HealthReport, ports::HealthCheckService};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Readiness summary",
    description = "Reports the configured AI and image providers, whether their keys are present \
                   and whether the upload directory accepts writes.",
    responses(
        (status = 200, body = HealthReport)
    ),
)]
pub async fn get_health(State(state): State<AppState>) -> Result<Response<HealthReport>, ApiError> {
    Ok(Response::OK(state.service.health().await))
}

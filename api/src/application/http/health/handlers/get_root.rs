use axum::extract::State;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    summary = "Liveness check",
    responses(
        (status = 200, body = RootResponse)
    ),
)]
pub async fn get_root(State(_state): State<AppState>) -> Result<Response<RootResponse>, ApiError> {
    Ok(Response::OK(RootResponse {
        message: "MenuLens API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "healthy".to_string(),
    }))
}

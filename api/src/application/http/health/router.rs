use axum::{Router, routing::get};
use utoipa::OpenApi;

use super::handlers::{
    get_health::{__path_get_health, get_health},
    get_root::{__path_get_root, get_root},
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_root, get_health))]
pub struct HealthApiDoc;

pub fn health_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;
    let root = if root_path.is_empty() {
        "/".to_string()
    } else {
        root_path.clone()
    };

    Router::new()
        .route(&root, get(get_root))
        .route(&format!("{root_path}/health"), get(get_health))
}

use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::handlers::{
    analyze_menu::{__path_analyze_menu, analyze_menu},
    delete_menu_item::{__path_delete_menu_item, delete_menu_item},
    get_menu_item::{__path_get_menu_item, get_menu_item},
    upload_menu::{__path_upload_menu, upload_menu},
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(upload_menu, analyze_menu, get_menu_item, delete_menu_item))]
pub struct MenuApiDoc;

pub fn menu_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/api/menu/upload", state.args.server.root_path),
            post(upload_menu),
        )
        .route(
            &format!("{}/api/menu/analyze", state.args.server.root_path),
            post(analyze_menu),
        )
        .route(
            &format!("{}/api/menu/items/{{filename}}", state.args.server.root_path),
            get(get_menu_item).delete(delete_menu_item),
        )
}

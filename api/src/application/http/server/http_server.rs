use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use menulens_core::{application::create_service, domain::common::MenuLensConfig};
use tower_http::cors::CorsLayer;
use tracing::{debug, info_span};
use utoipa_redoc::{Redoc, Servable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::application::http::{
    allergen::router::allergen_routes,
    health::router::health_routes,
    menu::router::menu_routes,
    server::{app_state::AppState, openapi::api_doc},
};
use crate::args::Args;

/// Room for multipart framing on top of the largest accepted image.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub async fn state(args: Arc<Args>) -> Result<AppState, anyhow::Error> {
    let config = MenuLensConfig::from(args.as_ref().clone());
    let service = create_service(config).await?;

    Ok(AppState::new(args, service))
}

///  Returns the [`Router`] of this application.
pub fn router(state: AppState) -> Result<Router, anyhow::Error> {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request| {
            let uri: String = request.uri().to_string();
            info_span!("http_request", method = ?request.method(), uri)
        },
    );

    let allowed_origins = state
        .args
        .server
        .allowed_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin.trim()))
        .collect::<Result<Vec<HeaderValue>, _>>()?;

    debug!("Allowed origins: {:?}", allowed_origins);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_origin(allowed_origins)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, CONTENT_LENGTH, ACCEPT])
        .allow_credentials(true);

    let mut openapi = api_doc();
    let mut paths = openapi.paths.clone();
    paths.paths = openapi
        .paths
        .paths
        .into_iter()
        .map(|(path, item)| (format!("{}{path}", state.args.server.root_path), item))
        .collect();
    openapi.paths = paths;

    let root_path = state.args.server.root_path.clone();
    let body_limit = state.args.storage.max_upload_size + MULTIPART_OVERHEAD;
    let metrics_enabled = state.args.server.metrics_enabled;

    let router = axum::Router::new()
        .merge(Scalar::with_url(
            format!("{}/scalar", root_path),
            openapi.clone(),
        ))
        .merge(Redoc::with_url(
            format!("{}/redoc", root_path),
            openapi.clone(),
        ))
        .route(
            &format!("{}/api-docs/openapi.json", root_path),
            get(move || async move { axum::Json(openapi) }),
        )
        .merge(menu_routes(state.clone()))
        .merge(allergen_routes(state.clone()))
        .merge(health_routes(state.clone()))
        .layer(DefaultBodyLimit::max(usize::try_from(body_limit)?));

    let router = if metrics_enabled {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router
            .route(
                &format!("{}/metrics", root_path),
                get(|| async move { metric_handle.render() }),
            )
            .layer(prometheus_layer)
    } else {
        router
    };

    Ok(router.layer(trace_layer).layer(cors).with_state(state))
}

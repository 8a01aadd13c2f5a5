use utoipa::OpenApi;

use crate::application::http::{
    allergen::router::AllergenApiDoc, health::router::HealthApiDoc, menu::router::MenuApiDoc,
    server::api_entities::api_error::ApiErrorResponse,
};

/// Full document: the nested feature APIs plus the root-level health routes.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.merge(HealthApiDoc::openapi());
    openapi
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MenuLens API",
        description = "Menu photo analysis: dishes, dietary classification, allergens and dish images"
    ),
    components(schemas(ApiErrorResponse)),
    nest(
        (path = "/api/menu", api = MenuApiDoc),
        (path = "/api", api = AllergenApiDoc),
    )
)]
pub struct ApiDoc;

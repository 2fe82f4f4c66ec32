//! OpenAPI specification

use axum::Json;
use axum::response::IntoResponse;
use utoipa::OpenApi;

use crate::api::routes::{health, view};
use crate::domain::table::{Column, ColumnType, Facet, FacetValue, ViewWarning};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FilterView API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Filterable table views over an external datastore"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "view", description = "Resource table views")
    ),
    paths(
        health::health,
        view::get_view,
        view::get_view_facets,
    ),
    components(schemas(
        Column,
        ColumnType,
        Facet,
        FacetValue,
        ViewWarning,
    ))
)]
pub struct ApiDoc;

/// Serve the OpenAPI specification as JSON
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

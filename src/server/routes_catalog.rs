use crate::catalog::{CatalogExtra, CatalogKind, CollectionSummary, ADDON_PREFIX};
use crate::server::AppContext;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

pub fn catalog_routes() -> Router<AppContext> {
    Router::new()
        .route("/catalog/:type/:id", get(get_catalog))
        .route("/catalog/:type/:id/:extra", get(get_catalog_with_extra))
}

/// Stremio meta preview for one collection.
#[derive(Serialize)]
struct Meta {
    id: String,
    #[serde(rename = "type")]
    media_type: &'static str,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logo: Option<String>,
}

impl From<CollectionSummary> for Meta {
    fn from(summary: CollectionSummary) -> Self {
        Self {
            id: format!("{ADDON_PREFIX}.{}", summary.id),
            media_type: "movie",
            name: summary.name,
            poster: summary.poster,
            logo: summary.logo,
        }
    }
}

#[derive(Serialize)]
struct MetasResponse {
    metas: Vec<Meta>,
}

async fn get_catalog(
    State(ctx): State<AppContext>,
    Path((media_type, id)): Path<(String, String)>,
) -> Result<Json<MetasResponse>, StatusCode> {
    serve_catalog(&ctx, &media_type, &id, None).await
}

async fn get_catalog_with_extra(
    State(ctx): State<AppContext>,
    Path((media_type, id, extra)): Path<(String, String, String)>,
) -> Result<Json<MetasResponse>, StatusCode> {
    serve_catalog(&ctx, &media_type, &id, Some(&extra)).await
}

async fn serve_catalog(
    ctx: &AppContext,
    media_type: &str,
    id: &str,
    extra: Option<&str>,
) -> Result<Json<MetasResponse>, StatusCode> {
    // Catalogs are published under the "collections" type.
    if media_type != "collections" {
        return Err(StatusCode::NOT_FOUND);
    }

    // Stremio appends ".json" to the resource path segments.
    let id = id.strip_suffix(".json").unwrap_or(id);
    let Some(kind) = CatalogKind::from_catalog_id(id) else {
        return Err(StatusCode::NOT_FOUND);
    };

    let extra = extra
        .map(|e| e.strip_suffix(".json").unwrap_or(e))
        .map(CatalogExtra::parse)
        .unwrap_or_default();

    let response = ctx.catalog.get_catalog(kind, &extra).await;
    let metas = response.metas.into_iter().map(Meta::from).collect();
    Ok(Json(MetasResponse { metas }))
}

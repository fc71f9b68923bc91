//! Library browsing routes.

use axum::{
    extract::{Path, Query, Request, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::error::AppError;
use super::AppContext;
use crate::catalog::{CatalogEntry, Library};

/// Create library routes.
pub fn library_routes() -> Router<AppContext> {
    Router::new()
        .route("/libraries", get(list_libraries))
        .route("/libraries/:id/files", get(list_files))
        .route("/libraries/:id/entry", get(get_entry))
        .route("/libraries/:id/raw/*path", get(raw_file))
}

/// Query parameters for a directory listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub path: String,
    /// Any value other than `false` includes hidden entries.
    pub hidden: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl ListQuery {
    fn include_hidden(&self) -> bool {
        self.hidden.as_deref().is_some_and(|h| h != "false")
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    #[serde(default)]
    pub path: String,
}

/// GET /api/libraries
async fn list_libraries(State(ctx): State<AppContext>) -> Json<Vec<Library>> {
    Json(ctx.catalog.libraries().to_vec())
}

/// GET /api/libraries/:id/files
async fn list_files(
    State(ctx): State<AppContext>,
    Path(id): Path<usize>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CatalogEntry>>, AppError> {
    let entries = ctx
        .catalog
        .list_library_path(
            id,
            &query.path,
            query.include_hidden(),
            query.page.unwrap_or(1),
            query.size.unwrap_or(0),
        )
        .await?;
    Ok(Json(entries))
}

/// GET /api/libraries/:id/entry
async fn get_entry(
    State(ctx): State<AppContext>,
    Path(id): Path<usize>,
    Query(query): Query<EntryQuery>,
) -> Result<Json<CatalogEntry>, AppError> {
    Ok(Json(ctx.catalog.get_entry(id, &query.path).await?))
}

/// GET /api/libraries/:id/raw/*path
async fn raw_file(
    State(ctx): State<AppContext>,
    Path((id, path)): Path<(usize, String)>,
    request: Request,
) -> Result<Response, AppError> {
    let file = ctx.catalog.file_path(id, &path).await?;
    match ServeFile::new(file).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use catalog_search_core::{ErrorKind, ProductIndex, SearchError, SearchResponse, SearchService};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router<I>(service: Arc<SearchService<I>>) -> Router
where
    I: ProductIndex + 'static,
{
    Router::new()
        .route("/api/search", get(search_products::<I>))
        .route("/api/search/", get(search_products::<I>))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn search_products<I>(
    State(service): State<Arc<SearchService<I>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, ApiError>
where
    I: ProductIndex + 'static,
{
    let response = service.search_pairs(params).await?;
    Ok(Json(response))
}

/// `{ "error": ... }` body with a status chosen by error kind.
pub struct ApiError(SearchError);

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
            ErrorKind::IndexUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.0.public_message() }));
        (status, body).into_response()
    }
}

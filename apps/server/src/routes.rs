//! HTTP route wiring and handlers.
//!
//! Thin I/O plumbing over [`Resolver`](cnsearch_core::Resolver): extract,
//! authorize, delegate, map errors to status codes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::error;

use cnsearch_shared::{CnSearchError, Item, SearchResult};

use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/search", post(search))
        .route("/insert", post(insert))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body of a `/search` request.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    /// Free-text company name to resolve.
    pub query: String,
    /// Per-request crawl override; defaults to the server-wide setting.
    #[serde(default)]
    pub crawl: Option<bool>,
}

async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResult>, StatusCode> {
    let api_key = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !state.keys.exists(api_key).await {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let allow_crawl = body.crawl.unwrap_or(state.crawling);

    match state.resolver.resolve(&body.query, allow_crawl).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            error!(error = %e, "search request failed");
            Err(status_for(&e))
        }
    }
}

async fn insert(
    State(state): State<AppState>,
    Json(item): Json<Item>,
) -> Result<StatusCode, StatusCode> {
    match state.resolver.insert(&item).await {
        Ok(()) => Ok(StatusCode::ACCEPTED),
        Err(e) => {
            error!(error = %e, "insert request failed");
            Err(status_for(&e))
        }
    }
}

async fn health(State(state): State<AppState>) -> StatusCode {
    if state.resolver.is_ready().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Map pipeline errors to response codes.
fn status_for(e: &CnSearchError) -> StatusCode {
    match e {
        CnSearchError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CnSearchError::InvalidField(_) | CnSearchError::InvalidFuzziness(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

use crate::config::ServiceConfig;
use crate::dispatch::WorkQueue;
use crate::engine::SearchEngine;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state handed to every request handler.
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub queue: WorkQueue,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct MatchesResponse {
    categories_matched: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the service router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/category/search", get(find_categories_for_query))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /category/search?text=...
///
/// Three outcomes: missing/empty `text` is a client error, zero matches is
/// a successful informational response, and matches come back as an
/// ordered list. Dictionary failures are translated to a server error so
/// "dictionary unavailable" is never mistaken for "no matches".
async fn find_categories_for_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params.text.filter(|text| !text.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "query string parameter text not found".to_string(),
            }),
        )
            .into_response();
    };

    let engine = state.engine.clone();
    let handle = state
        .queue
        .submit(async move { engine.search(&query).await });

    match handle.wait().await {
        Ok(Ok(matches)) if !matches.is_empty() => Json(MatchesResponse {
            categories_matched: matches,
        })
        .into_response(),
        Ok(Ok(_)) => Json(MessageResponse {
            message: "no matches found",
        })
        .into_response(),
        Ok(Err(err)) => {
            error!("Category search failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("Search worker lost: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Bind the listener and serve requests until shutdown.
pub async fn serve(config: ServiceConfig) -> anyhow::Result<()> {
    let engine = Arc::new(SearchEngine::new(&config.dictionary_path)?);
    let state = Arc::new(AppState {
        engine,
        queue: WorkQueue::new(config.max_concurrent_searches),
    });

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

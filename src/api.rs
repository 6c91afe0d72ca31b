use crate::PlaceId;
use crate::engine::Engine;
use axum::extract::{Path, Query, Request, State, rejection::PathRejection};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Builds the service router. All core errors are already mapped here:
/// bad input never reaches the engine, lookup misses become 404.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/places", get(get_completions))
        .route("/places/{id}", get(get_place))
        .route("/metrics", get(get_metrics))
        .route("/version", get(get_version))
        .layer(middleware::from_fn(log_requests))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
struct CompletionParams {
    text: Option<String>,
}

async fn get_completions(
    State(engine): State<Arc<Engine>>,
    Query(params): Query<CompletionParams>,
) -> Response {
    let text = params.text.unwrap_or_default();
    if text.is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    let results = engine.complete(&text);
    Json(results.as_ref()).into_response()
}

#[derive(Debug, Deserialize)]
struct PlaceParams {
    #[serde(rename = "houseNumber")]
    house_number: Option<String>,
}

async fn get_place(
    State(engine): State<Arc<Engine>>,
    id: Result<Path<PlaceId>, PathRejection>,
    Query(params): Query<PlaceParams>,
) -> Response {
    let Ok(Path(id)) = id else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let house_number = params.house_number.unwrap_or_default();
    match engine.lookup(id, &house_number) {
        Some(place) => Json(place.as_ref()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_metrics(State(engine): State<Arc<Engine>>) -> Response {
    Json(engine.metrics_snapshot()).into_response()
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: &'static str,
    hash: &'static str,
}

async fn get_version() -> Response {
    Json(VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        hash: option_env!("BUILD_GIT_HASH").unwrap_or("unknown"),
    })
    .into_response()
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        "[HTTP] {} {} -> {} ({:.1}ms)",
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    response
}

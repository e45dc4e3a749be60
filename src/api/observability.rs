//! Request accounting for the drama API.

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info_span, warn};

use crate::api::AppState;

const DRAMA_ROUTE: &str = "/api/dramas/{id}";

/// Prometheus text, or 404 while `observability.metrics_enabled` is off.
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.prometheus_handle {
        Some(handle) => handle.render().into_response(),
        None => (
            StatusCode::NOT_FOUND,
            "Metrics are disabled. Set observability.metrics_enabled = true",
        )
            .into_response(),
    }
}

/// Wraps each request in a span keyed by route template (and drama id on
/// per-record routes) and feeds the request counters.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());
    let drama_id = drama_id_segment(&route, req.uri().path()).map(str::to_string);

    let span = info_span!("api", %method, %route, drama_id = drama_id.as_deref());
    let response = next.run(req).instrument(span.clone()).await;

    let status = response.status();
    let elapsed = started.elapsed();

    metrics::counter!(
        "drama_api_requests_total",
        "route" => route.clone(),
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    metrics::histogram!("drama_api_request_duration_seconds", "route" => route)
        .record(elapsed.as_secs_f64());

    span.in_scope(|| {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        if status.is_server_error() {
            warn!(status = status.as_u16(), elapsed_ms, "Request failed");
        } else {
            debug!(status = status.as_u16(), elapsed_ms, "Request handled");
        }
    });

    response
}

/// The `{id}` segment of a per-record request, as sent.
fn drama_id_segment<'a>(route: &str, path: &'a str) -> Option<&'a str> {
    if route == DRAMA_ROUTE {
        path.rsplit('/').next().filter(|s| !s.is_empty())
    } else {
        None
    }
}

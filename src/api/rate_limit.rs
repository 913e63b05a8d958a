use crate::api::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

/// Records every rate-limit decision and warns when a request is throttled.
pub async fn log_rate_limit_events(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let retry_after = response
        .headers()
        .get("retry-after")
        .or_else(|| response.headers().get("x-ratelimit-after"))
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    state.rate_limit_service.log_decision(response.status(), retry_after);

    response
}

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// One line per request: method, path, status, latency. Storage
/// operations themselves never log, so this is the only place request
/// traffic shows up.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "{} {}",
        method,
        path,
    );

    response
}

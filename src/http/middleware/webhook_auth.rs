use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

/// Passes everything through when no secret is configured.
pub async fn require_webhook_secret(
    State(expected): State<Option<String>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if provided != expected {
        tracing::warn!(path = %request.uri().path(), "webhook rejected: bad or missing secret");
        return Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .body(Body::from("unauthorized"))
            .unwrap_or_else(|_| Response::new(Body::from("unauthorized")));
    }

    next.run(request).await
}

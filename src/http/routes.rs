use crate::http::handlers::{ops, sessions};
use crate::http::middleware::webhook_auth::require_webhook_secret;
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

pub fn router(state: AppState, webhook_secret: Option<String>) -> Router {
    let webhooks = Router::new()
        .route(
            "/payment-gateway-initialize-session",
            post(sessions::payment_gateway_initialize_session),
        )
        .route(
            "/transaction-initialize-session",
            post(sessions::transaction_initialize_session),
        )
        .route(
            "/transaction-process-session",
            post(sessions::transaction_process_session),
        )
        .route(
            "/transaction-charge-requested",
            post(sessions::transaction_charge_requested),
        )
        .route(
            "/transaction-refund-requested",
            post(sessions::transaction_refund_requested),
        )
        .route(
            "/transaction-cancel-requested",
            post(sessions::transaction_cancel_requested),
        )
        .layer(from_fn_with_state(webhook_secret, require_webhook_secret));

    Router::new()
        .route("/health", get(ops::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .nest("/api/v1/webhooks", webhooks)
        .with_state(state)
}

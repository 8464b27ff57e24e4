use crate::domain::session::{EnvelopeErrors, FieldError, SessionOutcome};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

impl IntoResponse for SessionOutcome {
    fn into_response(self) -> Response {
        match self {
            SessionOutcome::Processed(resp) => (StatusCode::OK, Json(resp)).into_response(),
            SessionOutcome::Rejected(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
        }
    }
}

fn malformed_body(rejection: JsonRejection) -> Response {
    tracing::info!(error = %rejection.body_text(), "unreadable webhook body");
    SessionOutcome::Rejected(EnvelopeErrors {
        errors: vec![FieldError {
            field: "body".to_string(),
            message: rejection.body_text(),
            code: "INVALID".to_string(),
        }],
    })
    .into_response()
}

pub async fn transaction_initialize_session(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => state.session_service.initialize(body).await.into_response(),
        Err(rejection) => malformed_body(rejection),
    }
}

pub async fn transaction_process_session(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => state.session_service.process(body).await.into_response(),
        Err(rejection) => malformed_body(rejection),
    }
}

pub async fn transaction_charge_requested(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => state.session_service.charge_requested(body).await.into_response(),
        Err(rejection) => malformed_body(rejection),
    }
}

pub async fn transaction_refund_requested(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => state.session_service.refund_requested(body).await.into_response(),
        Err(rejection) => malformed_body(rejection),
    }
}

pub async fn transaction_cancel_requested(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => state.session_service.cancel_requested(body).await.into_response(),
        Err(rejection) => malformed_body(rejection),
    }
}

pub async fn payment_gateway_initialize_session(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    (StatusCode::OK, Json(state.session_service.gateway_initialize(body)))
}

use crate::classifier::{classify, failure_action, ProcessorOperation, SessionStage};
use crate::domain::amount::{to_major, to_minor};
use crate::domain::event::TransactionAction;
use crate::domain::processor::{CreateOrderRequest, ProcessorPaymentStatus};
use crate::domain::session::{
    EnvelopeErrors, FieldError, GatewayConfigData, GatewayConfigEntry, GatewayInitializePayload,
    GatewayInitializeResponse, InitializeSessionPayload, ProcessSessionPayload, SessionOutcome,
    SessionRequest, SessionResponse, TransactionReferencePayload,
};
use crate::error::SessionError;
use crate::gateways::{GatewayError, ProcessorGateway};
use crate::receipt::{build_receipt, order_notes};
use crate::service::error_classifier::{failure_response, FailureContext};
use crate::service::response::{
    dashboard_url, order_data, payment_data, refund_data, scalar_data, synthesize_success,
    DashboardEntity,
};
use crate::validation::{
    action_hint, has_event, include_psp_reference_hint, is_blank, parse_amount, parse_currency,
    parse_identifier, validate_initialize, validate_process, validate_reference,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

pub const GATEWAY_ID: &str = "razorpay.payment.gateway";

#[derive(Clone)]
pub struct SessionService {
    pub gateway: Arc<dyn ProcessorGateway>,
    pub default_currency: String,
    pub dashboard_base_url: String,
    pub key_id: String,
}

impl SessionService {
    pub async fn initialize(&self, body: Value) -> SessionOutcome {
        let stage = SessionStage::Initialize;
        let payload: InitializeSessionPayload = match decode_envelope(body) {
            Ok(p) => p,
            Err(e) => return SessionOutcome::Rejected(e),
        };

        let data = payload.data.as_ref();
        if !has_event(data) {
            let mut missing = Vec::new();
            if is_blank(payload.transaction_id.as_ref()) {
                missing.push("transactionId");
            }
            if is_blank(payload.amount.as_ref()) {
                missing.push("amount");
            }
            if !missing.is_empty() {
                return reject(stage, EnvelopeErrors::missing(&missing));
            }
        }

        let ctx = FailureContext {
            stage,
            action: failure_action(stage, action_hint(payload.action.as_ref(), data)),
            amount: amount_hint(payload.amount.as_ref()),
            psp_reference: None,
            include_psp_reference: include_psp_reference_hint(data),
        };
        let result = match validate_initialize(&payload, &self.default_currency) {
            Ok(req) => self.execute(stage, req).await,
            Err(e) => Err(e.into()),
        };
        self.finish(&ctx, result)
    }

    pub async fn process(&self, body: Value) -> SessionOutcome {
        let stage = SessionStage::Process;
        let payload: ProcessSessionPayload = match decode_envelope(body) {
            Ok(p) => p,
            Err(e) => return SessionOutcome::Rejected(e),
        };

        let data = payload.data.as_ref();
        if !has_event(data) && is_blank(payload.payment_id.as_ref()) {
            return reject(stage, EnvelopeErrors::missing(&["paymentId"]));
        }

        let ctx = FailureContext {
            stage,
            action: failure_action(stage, action_hint(payload.action.as_ref(), data)),
            amount: amount_hint(payload.amount.as_ref()),
            psp_reference: identifier_hint(payload.payment_id.as_ref()),
            include_psp_reference: include_psp_reference_hint(data),
        };
        let result = match validate_process(&payload, &self.default_currency) {
            Ok(req) => self.execute(stage, req).await,
            Err(e) => Err(e.into()),
        };
        self.finish(&ctx, result)
    }

    pub async fn charge_requested(&self, body: Value) -> SessionOutcome {
        self.reference_session(SessionStage::ChargeRequested, TransactionAction::Charge, body)
            .await
    }

    pub async fn refund_requested(&self, body: Value) -> SessionOutcome {
        self.reference_session(SessionStage::RefundRequested, TransactionAction::Refund, body)
            .await
    }

    pub async fn cancel_requested(&self, body: Value) -> SessionOutcome {
        self.reference_session(SessionStage::CancelRequested, TransactionAction::Cancel, body)
            .await
    }

    /// Gateway configuration handed to the storefront before any transaction exists.
    pub fn gateway_initialize(&self, body: Value) -> GatewayInitializeResponse {
        let payload: GatewayInitializePayload = serde_json::from_value(body).unwrap_or_default();
        let mut errors = Vec::new();

        let amount = parse_amount("amount", payload.amount.as_ref()).unwrap_or_else(|e| {
            errors.push(field_error(&e.field, &e.message));
            None
        });
        let currency = parse_currency(payload.currency.as_ref(), &self.default_currency)
            .unwrap_or_else(|e| {
                errors.push(field_error(&e.field, &e.message));
                self.default_currency.clone()
            });

        GatewayInitializeResponse {
            gateway_configs: vec![GatewayConfigEntry {
                id: GATEWAY_ID.to_string(),
                data: GatewayConfigData {
                    key_id: self.key_id.clone(),
                    amount,
                    currency,
                    name: "Razorpay".to_string(),
                    description: "Pay securely with Razorpay".to_string(),
                    supported_currencies: ["INR", "USD", "EUR", "GBP"].map(String::from).to_vec(),
                    supported_payment_methods: ["card", "netbanking", "wallet", "upi"]
                        .map(String::from)
                        .to_vec(),
                },
                errors,
            }],
            errors: Vec::new(),
        }
    }

    async fn reference_session(
        &self,
        stage: SessionStage,
        action: TransactionAction,
        body: Value,
    ) -> SessionOutcome {
        let payload: TransactionReferencePayload = match decode_envelope(body) {
            Ok(p) => p,
            Err(e) => return SessionOutcome::Rejected(e),
        };

        // A missing reference is a soft failure in the endpoint's own family.
        let data = payload.data.as_ref();
        let ctx = FailureContext {
            stage,
            action,
            amount: amount_hint(payload.amount.as_ref()),
            psp_reference: identifier_hint(payload.transaction_reference.as_ref()),
            include_psp_reference: include_psp_reference_hint(data),
        };
        let result = match validate_reference(&payload, action, &self.default_currency) {
            Ok(req) => self.execute(stage, req).await,
            Err(e) => Err(e.into()),
        };
        self.finish(&ctx, result)
    }

    async fn execute(
        &self,
        stage: SessionStage,
        req: SessionRequest,
    ) -> Result<SessionResponse, SessionError> {
        tracing::info!(
            stage = stage.as_str(),
            action = req.action.as_str(),
            reference = %req.transaction_id,
            "session request"
        );

        match classify(req.action, stage)? {
            ProcessorOperation::CreateOrder => self.create_order(&req).await,
            ProcessorOperation::CaptureOrFetch => self.capture_or_fetch(&req).await,
            ProcessorOperation::Refund => self.refund(&req).await,
            ProcessorOperation::Cancel => Ok(self.cancel(&req)),
        }
    }

    async fn create_order(&self, req: &SessionRequest) -> Result<SessionResponse, SessionError> {
        let amount = req
            .amount
            .ok_or_else(|| SessionError::Internal("validated request lost its amount".to_string()))?;
        let receipt = build_receipt(&req.transaction_id);

        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount_minor: to_minor(amount),
                currency: req.currency.clone(),
                receipt: receipt.clone(),
                notes: order_notes(&req.transaction_id, req.idempotency_key.as_deref()),
            })
            .await?;

        Ok(synthesize_success(
            &req.event,
            amount,
            &order.id,
            Some(dashboard_url(&self.dashboard_base_url, DashboardEntity::Order, &order.id)),
            "Razorpay order created successfully",
            order_data(&order, &receipt, &self.key_id),
        ))
    }

    // Fetch, then capture only when a charge meets an authorized payment. At most two
    // sequential processor calls.
    async fn capture_or_fetch(&self, req: &SessionRequest) -> Result<SessionResponse, SessionError> {
        let payment = self.gateway.fetch_payment(&req.transaction_id).await?;

        let (payment, message) = match (req.action, payment.status) {
            (_, ProcessorPaymentStatus::Captured) => (payment, "Payment already captured"),
            (TransactionAction::Charge, ProcessorPaymentStatus::Authorized) => {
                let amount_minor = req.amount.map(to_minor).unwrap_or(payment.amount);
                let captured = self
                    .gateway
                    .capture_payment(&payment.id, amount_minor, &payment.currency)
                    .await?;
                (captured, "Payment captured successfully")
            }
            (TransactionAction::Authorization, ProcessorPaymentStatus::Authorized) => {
                (payment, "Payment authorized successfully")
            }
            (_, status) => {
                return Err(SessionError::Gateway(GatewayError::Rejected {
                    status: 409,
                    code: Some("INVALID_PAYMENT_STATE".to_string()),
                    description: format!(
                        "payment {} is {} and cannot be charged",
                        payment.id,
                        status.as_str()
                    ),
                }))
            }
        };

        Ok(synthesize_success(
            &req.event,
            req.amount.unwrap_or_else(|| to_major(payment.amount)),
            &payment.id,
            Some(dashboard_url(&self.dashboard_base_url, DashboardEntity::Payment, &payment.id)),
            message,
            payment_data(&payment),
        ))
    }

    async fn refund(&self, req: &SessionRequest) -> Result<SessionResponse, SessionError> {
        let refund = self
            .gateway
            .refund_payment(&req.transaction_id, req.amount.map(to_minor))
            .await?;

        Ok(synthesize_success(
            &req.event,
            req.amount.unwrap_or_else(|| to_major(refund.amount)),
            &refund.id,
            Some(dashboard_url(&self.dashboard_base_url, DashboardEntity::Refund, &refund.id)),
            "Refund processed successfully",
            refund_data(&refund, &req.transaction_id),
        ))
    }

    // The processor cannot void authorized or captured funds, so cancel is confirmed
    // without a remote call.
    fn cancel(&self, req: &SessionRequest) -> SessionResponse {
        synthesize_success(
            &req.event,
            req.amount.unwrap_or(0.0),
            &req.transaction_id,
            Some(dashboard_url(
                &self.dashboard_base_url,
                DashboardEntity::Payment,
                &req.transaction_id,
            )),
            "Payment cancelled successfully",
            scalar_data([
                ("paymentId", json!(req.transaction_id)),
                ("currency", json!(req.currency)),
                ("status", json!("cancelled")),
            ]),
        )
    }

    fn finish(
        &self,
        ctx: &FailureContext,
        result: Result<SessionResponse, SessionError>,
    ) -> SessionOutcome {
        let response = match result {
            Ok(resp) => resp,
            Err(err) => {
                match &err {
                    SessionError::Validation(e) => {
                        tracing::info!(stage = ctx.stage.as_str(), field = %e.field, "session payload rejected")
                    }
                    SessionError::Gateway(_) | SessionError::NotFound(_) => {
                        tracing::warn!(stage = ctx.stage.as_str(), error = %err, "processor call failed")
                    }
                    SessionError::Internal(_) => {
                        tracing::error!(stage = ctx.stage.as_str(), error = %err, "session failed")
                    }
                }
                failure_response(ctx, &err)
            }
        };

        tracing::info!(
            stage = ctx.stage.as_str(),
            result = response.result.as_str(),
            "session response"
        );
        SessionOutcome::Processed(response)
    }
}

fn decode_envelope<T: DeserializeOwned>(body: Value) -> Result<T, EnvelopeErrors> {
    if !body.is_object() {
        return Err(EnvelopeErrors {
            errors: vec![field_error("body", "Expected JSON object")],
        });
    }
    serde_json::from_value(body).map_err(|e| EnvelopeErrors {
        errors: vec![field_error("body", &e.to_string())],
    })
}

fn reject(stage: SessionStage, errors: EnvelopeErrors) -> SessionOutcome {
    tracing::info!(stage = stage.as_str(), "malformed session envelope");
    SessionOutcome::Rejected(errors)
}

fn field_error(field: &str, message: &str) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: message.to_string(),
        code: "INVALID".to_string(),
    }
}

// Echoes the requested amount even when it failed validation.
fn amount_hint(value: Option<&Value>) -> f64 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|a| a.is_finite()).unwrap_or(0.0)
}

fn identifier_hint(value: Option<&Value>) -> Option<String> {
    parse_identifier("reference", value).ok().flatten()
}

use crate::classifier::{failure_result, SessionStage};
use crate::domain::event::TransactionAction;
use crate::domain::session::SessionResponse;
use crate::error::SessionError;
use crate::service::actions::transaction_actions;
use serde_json::json;
use std::collections::BTreeMap;

/// What is known about a request before validation, enough to answer with a
/// well-formed failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureContext {
    pub stage: SessionStage,
    pub action: TransactionAction,
    pub amount: f64,
    pub psp_reference: Option<String>,
    pub include_psp_reference: bool,
}

fn operation_label(stage: SessionStage) -> &'static str {
    match stage {
        SessionStage::Initialize => "Order creation",
        SessionStage::Process => "Payment processing",
        SessionStage::ChargeRequested => "Charge processing",
        SessionStage::RefundRequested => "Refund processing",
        SessionStage::CancelRequested => "Cancel processing",
    }
}

pub fn failure_message(stage: SessionStage, err: &SessionError) -> String {
    match err {
        SessionError::Validation(_) | SessionError::Internal(_) => err.to_string(),
        SessionError::Gateway(_) | SessionError::NotFound(_) => {
            format!("{} failed: {}", operation_label(stage), err)
        }
    }
}

pub fn failure_response(ctx: &FailureContext, err: &SessionError) -> SessionResponse {
    let result = failure_result(ctx.action);

    let mut data = BTreeMap::new();
    data.insert("exception".to_string(), json!(true));
    data.insert("errorKind".to_string(), json!(err.kind()));
    if let SessionError::Gateway(gateway_err) = err {
        if let Some(code) = gateway_err.code() {
            data.insert("errorCode".to_string(), json!(code));
        }
    }

    let psp_reference = ctx.include_psp_reference.then(|| {
        ctx.psp_reference
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    });

    SessionResponse {
        psp_reference,
        result,
        message: failure_message(ctx.stage, err),
        amount: ctx.amount,
        actions: transaction_actions(result),
        external_url: None,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::TransactionEventType;
    use crate::gateways::GatewayError;
    use crate::validation::ValidationError;

    fn ctx(action: TransactionAction) -> FailureContext {
        FailureContext {
            stage: SessionStage::Process,
            action,
            amount: 2.0,
            psp_reference: Some("pay_1".to_string()),
            include_psp_reference: true,
        }
    }

    #[test]
    fn validation_failures_are_flagged() {
        let err = SessionError::from(ValidationError::new("data.event.type", "Required"));
        let resp = failure_response(&ctx(TransactionAction::Charge), &err);
        assert_eq!(resp.result, TransactionEventType::ChargeFailure);
        assert!(resp.message.starts_with("Validation error"));
        assert_eq!(resp.amount, 2.0);
        assert!(resp.actions.is_empty());
        assert_eq!(resp.data.get("exception"), Some(&json!(true)));
        assert_eq!(resp.data.get("errorKind"), Some(&json!("VALIDATION")));
    }

    #[test]
    fn gateway_failures_carry_processor_text() {
        let err = SessionError::from(GatewayError::Rejected {
            status: 400,
            code: Some("BAD_REQUEST_ERROR".to_string()),
            description: "Payment was declined".to_string(),
        });
        let resp = failure_response(&ctx(TransactionAction::Authorization), &err);
        assert_eq!(resp.result, TransactionEventType::AuthorizationFailure);
        assert_eq!(resp.message, "Payment processing failed: Payment was declined");
        assert_eq!(resp.data.get("errorCode"), Some(&json!("BAD_REQUEST_ERROR")));
        assert_eq!(resp.psp_reference.as_deref(), Some("pay_1"));
    }

    #[test]
    fn not_found_is_its_own_kind() {
        let err = SessionError::from(GatewayError::NotFound("The id provided does not exist".to_string()));
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn psp_reference_is_generated_or_omitted() {
        let mut c = ctx(TransactionAction::Refund);
        c.psp_reference = None;
        let err = SessionError::Internal("boom".to_string());
        let resp = failure_response(&c, &err);
        assert!(resp.psp_reference.is_some_and(|r| !r.is_empty()));

        c.include_psp_reference = false;
        assert!(failure_response(&c, &err).psp_reference.is_none());
    }
}

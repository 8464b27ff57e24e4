use crate::domain::event::{TransactionAction, TransactionEvent, TransactionEventType};
use crate::domain::session::{
    InitializeSessionPayload, ProcessSessionPayload, SessionRequest, TransactionReferencePayload,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn required(field: &str) -> Self {
        Self::new(field, "Required")
    }
}

pub fn validate_initialize(
    payload: &InitializeSessionPayload,
    default_currency: &str,
) -> Result<SessionRequest, ValidationError> {
    let event = parse_event(payload.data.as_ref())?;
    let action = session_action(payload.action.as_ref(), &event)?;

    let amount = parse_amount("amount", payload.amount.as_ref())?
        .ok_or_else(|| ValidationError::required("amount"))?;
    let transaction_id = parse_identifier("transactionId", payload.transaction_id.as_ref())?
        .ok_or_else(|| ValidationError::required("transactionId"))?;

    Ok(SessionRequest {
        action,
        amount: Some(amount),
        currency: parse_currency(payload.currency.as_ref(), default_currency)?,
        transaction_id,
        idempotency_key: parse_identifier("idempotencyKey", payload.idempotency_key.as_ref())?,
        event,
        raw_data: payload.data.clone().unwrap_or(Value::Null),
    })
}

pub fn validate_process(
    payload: &ProcessSessionPayload,
    default_currency: &str,
) -> Result<SessionRequest, ValidationError> {
    let event = parse_event(payload.data.as_ref())?;
    let action = session_action(payload.action.as_ref(), &event)?;

    let payment_id = parse_identifier("paymentId", payload.payment_id.as_ref())?
        .ok_or_else(|| ValidationError::required("paymentId"))?;

    Ok(SessionRequest {
        action,
        amount: parse_amount("amount", payload.amount.as_ref())?,
        currency: parse_currency(payload.currency.as_ref(), default_currency)?,
        transaction_id: payment_id,
        idempotency_key: None,
        event,
        raw_data: payload.data.clone().unwrap_or(Value::Null),
    })
}

/// Charge, refund and cancel requests carry a fixed action decided by the endpoint.
pub fn validate_reference(
    payload: &TransactionReferencePayload,
    action: TransactionAction,
    default_currency: &str,
) -> Result<SessionRequest, ValidationError> {
    let reference = parse_identifier("transactionReference", payload.transaction_reference.as_ref())?
        .ok_or_else(|| ValidationError::required("transactionReference"))?;

    let event = parse_event(payload.data.as_ref())?;
    ensure_event_family(&event, action)?;

    Ok(SessionRequest {
        action,
        amount: parse_amount("amount", payload.amount.as_ref())?,
        currency: parse_currency(payload.currency.as_ref(), default_currency)?,
        transaction_id: reference,
        idempotency_key: None,
        event,
        raw_data: payload.data.clone().unwrap_or(Value::Null),
    })
}

pub fn parse_event(data: Option<&Value>) -> Result<TransactionEvent, ValidationError> {
    let event = data
        .and_then(|d| d.get("event"))
        .filter(|e| !e.is_null())
        .ok_or_else(|| ValidationError::required("data.event"))?;
    let event = event
        .as_object()
        .ok_or_else(|| ValidationError::new("data.event", "Expected object"))?;

    let event_type = match event.get("type") {
        Some(Value::String(s)) => TransactionEventType::parse(s).ok_or_else(|| {
            let expected: Vec<&str> = TransactionEventType::ALL.iter().map(|t| t.as_str()).collect();
            ValidationError::new(
                "data.event.type",
                format!("Invalid enum value '{}', expected one of {}", s, expected.join(" | ")),
            )
        })?,
        None | Some(Value::Null) => return Err(ValidationError::required("data.event.type")),
        Some(_) => return Err(ValidationError::new("data.event.type", "Expected string")),
    };

    let include_psp_reference = match event.get("includePspReference") {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            return Err(ValidationError::new(
                "data.event.includePspReference",
                "Expected boolean",
            ))
        }
    };

    Ok(TransactionEvent {
        event_type,
        include_psp_reference,
    })
}

pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

pub fn has_event(data: Option<&Value>) -> bool {
    data.and_then(|d| d.get("event")).is_some_and(|e| !e.is_null())
}

/// Best-effort read of `includePspReference` for failure responses built before the
/// event could be parsed.
pub fn include_psp_reference_hint(data: Option<&Value>) -> bool {
    data.and_then(|d| d.get("event"))
        .and_then(|e| e.get("includePspReference"))
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

pub fn parse_action(
    value: Option<&Value>,
    default: TransactionAction,
) -> Result<TransactionAction, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(default),
        Some(Value::String(s)) => TransactionAction::parse(s)
            .ok_or_else(|| ValidationError::new("action", format!("Invalid enum value '{}'", s))),
        Some(_) => Err(ValidationError::new("action", "Expected string")),
    }
}

/// Initialize and process take their action from the event family unless the caller
/// names one explicitly, in which case the event must belong to it.
pub fn session_action(
    value: Option<&Value>,
    event: &TransactionEvent,
) -> Result<TransactionAction, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(event.event_type.action()),
        Some(_) => {
            let action = parse_action(value, event.event_type.action())?;
            ensure_event_family(event, action)?;
            Ok(action)
        }
    }
}

/// Best-effort action for failure responses built before validation succeeded.
pub fn action_hint(action: Option<&Value>, data: Option<&Value>) -> Option<TransactionAction> {
    match action {
        None | Some(Value::Null) => data
            .and_then(|d| d.get("event"))
            .and_then(|e| e.get("type"))
            .and_then(Value::as_str)
            .and_then(TransactionEventType::parse)
            .map(|t| t.action()),
        Some(Value::String(s)) => TransactionAction::parse(s),
        Some(_) => None,
    }
}

/// Amounts are decimal major units; numeric strings are accepted.
pub fn parse_amount(field: &str, value: Option<&Value>) -> Result<Option<f64>, ValidationError> {
    let amount = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    }
    .ok_or_else(|| ValidationError::new(field, "Expected number"))?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::new(field, "Number must be greater than 0"));
    }
    Ok(Some(amount))
}

/// Empty strings count as absent.
pub fn parse_identifier(field: &str, value: Option<&Value>) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(_) => Err(ValidationError::new(field, "Expected string")),
    }
}

pub fn parse_currency(value: Option<&Value>, default: &str) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) if s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            Ok(s.to_ascii_uppercase())
        }
        Some(_) => Err(ValidationError::new("currency", "Expected ISO-4217 currency code")),
    }
}

pub fn ensure_event_family(
    event: &TransactionEvent,
    action: TransactionAction,
) -> Result<(), ValidationError> {
    if event.event_type.action() != action {
        return Err(ValidationError::new(
            "data.event.type",
            format!(
                "{} does not belong to the {} action",
                event.event_type.as_str(),
                action.as_str()
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn include_psp_reference_defaults_to_true() {
        let data = json!({"event": {"type": "CHARGE_SUCCESS"}});
        let event = parse_event(Some(&data)).unwrap();
        assert_eq!(event.event_type, TransactionEventType::ChargeSuccess);
        assert!(event.include_psp_reference);
    }

    #[test]
    fn include_psp_reference_must_be_boolean() {
        let data = json!({"event": {"type": "CHARGE_SUCCESS", "includePspReference": "yes"}});
        let err = parse_event(Some(&data)).unwrap_err();
        assert_eq!(err.field, "data.event.includePspReference");
    }

    #[test]
    fn rejects_unknown_event_type() {
        let data = json!({"event": {"type": "CHARGE_PENDING"}});
        let err = parse_event(Some(&data)).unwrap_err();
        assert_eq!(err.field, "data.event.type");
        assert!(err.message.contains("CHARGE_PENDING"));
    }

    #[test]
    fn missing_event_is_required() {
        let err = parse_event(Some(&json!({}))).unwrap_err();
        assert_eq!(err.field, "data.event");
        assert!(!has_event(Some(&json!({"event": null}))));
    }

    #[test]
    fn amount_accepts_numeric_strings_and_rejects_non_positive() {
        assert_eq!(parse_amount("amount", Some(&json!("2.50"))).unwrap(), Some(2.5));
        assert_eq!(parse_amount("amount", None).unwrap(), None);
        assert!(parse_amount("amount", Some(&json!(0))).is_err());
        assert!(parse_amount("amount", Some(&json!(-1.0))).is_err());
        assert!(parse_amount("amount", Some(&json!(true))).is_err());
    }

    #[test]
    fn currency_defaults_and_normalises() {
        assert_eq!(parse_currency(None, "INR").unwrap(), "INR");
        assert_eq!(parse_currency(Some(&json!("usd")), "INR").unwrap(), "USD");
        assert!(parse_currency(Some(&json!("RUPEE")), "INR").is_err());
    }

    #[test]
    fn event_must_match_requested_action() {
        let payload = TransactionReferencePayload {
            transaction_reference: Some(json!("pay_1")),
            data: Some(json!({"event": {"type": "CHARGE_SUCCESS"}})),
            ..Default::default()
        };
        let err = validate_reference(&payload, TransactionAction::Refund, "INR").unwrap_err();
        assert_eq!(err.field, "data.event.type");
    }

    #[test]
    fn blank_identifier_is_missing() {
        let payload = TransactionReferencePayload {
            transaction_reference: Some(json!("")),
            data: Some(json!({"event": {"type": "REFUND_SUCCESS"}})),
            ..Default::default()
        };
        let err = validate_reference(&payload, TransactionAction::Refund, "INR").unwrap_err();
        assert_eq!(err, ValidationError::new("transactionReference", "Required"));
    }

    #[test]
    fn initialize_builds_session_request() {
        let payload = InitializeSessionPayload {
            amount: Some(json!(2.0)),
            transaction_id: Some(json!("txn-1")),
            data: Some(json!({"event": {"type": "AUTHORIZATION_SUCCESS", "includePspReference": false}})),
            action: Some(json!("AUTHORIZATION")),
            ..Default::default()
        };
        let req = validate_initialize(&payload, "INR").unwrap();
        assert_eq!(req.action, TransactionAction::Authorization);
        assert_eq!(req.amount, Some(2.0));
        assert_eq!(req.currency, "INR");
        assert_eq!(req.transaction_id, "txn-1");
        assert!(!req.event.include_psp_reference);
    }

    #[test]
    fn action_follows_event_family_when_not_named() {
        let payload = ProcessSessionPayload {
            payment_id: Some(json!("pay_abc")),
            data: Some(json!({"event": {"type": "AUTHORIZATION_SUCCESS"}})),
            ..Default::default()
        };
        let req = validate_process(&payload, "INR").unwrap();
        assert_eq!(req.action, TransactionAction::Authorization);

        let explicit = ProcessSessionPayload {
            action: Some(json!("CHARGE")),
            ..payload
        };
        let err = validate_process(&explicit, "INR").unwrap_err();
        assert_eq!(err.field, "data.event.type");
    }

    #[test]
    fn action_hint_reads_event_type() {
        let data = json!({"event": {"type": "AUTHORIZATION_FAILURE"}});
        assert_eq!(action_hint(None, Some(&data)), Some(TransactionAction::Authorization));
        assert_eq!(
            action_hint(Some(&json!("CHARGE")), Some(&data)),
            Some(TransactionAction::Charge)
        );
        assert_eq!(action_hint(None, Some(&json!({"event": {"type": "AUTH_OK"}}))), None);
    }
}

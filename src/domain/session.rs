use crate::domain::event::{TransactionAction, TransactionEvent, TransactionEventType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// Inbound payloads keep loosely typed fields so that a wrong type surfaces as a
// validation failure with a field name instead of a framework-level rejection.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeSessionPayload {
    pub action: Option<Value>,
    pub amount: Option<Value>,
    pub currency: Option<Value>,
    pub transaction_id: Option<Value>,
    pub idempotency_key: Option<Value>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSessionPayload {
    pub action: Option<Value>,
    pub amount: Option<Value>,
    pub currency: Option<Value>,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: Option<Value>,
    pub data: Option<Value>,
}

/// Shared shape of the charge, refund and cancel requests, which all point at an
/// existing processor payment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReferencePayload {
    pub amount: Option<Value>,
    pub currency: Option<Value>,
    #[serde(alias = "payment_id", alias = "pspReference")]
    pub transaction_reference: Option<Value>,
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayInitializePayload {
    pub amount: Option<Value>,
    pub currency: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub action: TransactionAction,
    pub amount: Option<f64>,
    pub currency: String,
    pub transaction_id: String,
    pub idempotency_key: Option<String>,
    pub event: TransactionEvent,
    pub raw_data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psp_reference: Option<String>,
    pub result: TransactionEventType,
    pub message: String,
    pub amount: f64,
    pub actions: Vec<TransactionAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    pub data: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeErrors {
    pub errors: Vec<FieldError>,
}

impl EnvelopeErrors {
    pub fn missing(fields: &[&str]) -> Self {
        Self {
            errors: fields
                .iter()
                .map(|f| FieldError {
                    field: f.to_string(),
                    message: "Missing required field".to_string(),
                    code: "INVALID".to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Processed(SessionResponse),
    Rejected(EnvelopeErrors),
}

impl SessionOutcome {
    pub fn processed(self) -> Option<SessionResponse> {
        match self {
            SessionOutcome::Processed(resp) => Some(resp),
            SessionOutcome::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfigData {
    pub key_id: String,
    pub amount: Option<f64>,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub supported_currencies: Vec<String>,
    pub supported_payment_methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GatewayConfigEntry {
    pub id: String,
    pub data: GatewayConfigData,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GatewayInitializeResponse {
    pub gateway_configs: Vec<GatewayConfigEntry>,
    pub errors: Vec<FieldError>,
}

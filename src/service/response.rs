use crate::domain::event::TransactionEvent;
use crate::domain::processor::{ProcessorOrder, ProcessorPayment, ProcessorRefund};
use crate::domain::session::SessionResponse;
use crate::service::actions::transaction_actions;
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEntity {
    Order,
    Payment,
    Refund,
}

pub fn dashboard_url(base_url: &str, entity: DashboardEntity, id: &str) -> String {
    let segment = match entity {
        DashboardEntity::Order => "orders",
        DashboardEntity::Payment => "payments",
        DashboardEntity::Refund => "refunds",
    };
    format!("{}/{}/{}", base_url.trim_end_matches('/'), segment, id)
}

/// The platform only accepts scalar values in `data`: nulls are dropped and nested
/// values are carried as their JSON text.
pub fn scalar_data<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> BTreeMap<String, Value> {
    fields
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
                scalar => scalar,
            };
            Some((key.to_string(), value))
        })
        .collect()
}

pub fn order_data(order: &ProcessorOrder, receipt: &str, key_id: &str) -> BTreeMap<String, Value> {
    scalar_data([
        ("orderId", json!(order.id)),
        ("amount", json!(order.amount)),
        ("currency", json!(order.currency)),
        ("receipt", json!(order.receipt.as_deref().unwrap_or(receipt))),
        ("keyId", json!(key_id)),
    ])
}

pub fn payment_data(payment: &ProcessorPayment) -> BTreeMap<String, Value> {
    scalar_data([
        ("paymentId", json!(payment.id)),
        ("status", json!(payment.status.as_str())),
        ("method", json!(payment.method)),
        ("currency", json!(payment.currency)),
        ("amount", json!(payment.amount)),
        ("orderId", json!(payment.order_id)),
    ])
}

pub fn refund_data(refund: &ProcessorRefund, payment_id: &str) -> BTreeMap<String, Value> {
    scalar_data([
        ("refundId", json!(refund.id)),
        ("paymentId", json!(refund.payment_id.as_deref().unwrap_or(payment_id))),
        ("status", json!(refund.status)),
        ("amount", json!(refund.amount)),
        ("currency", json!(refund.currency)),
    ])
}

/// Echoes the caller's declared event type and amount; the processor id becomes the
/// PSP reference when the caller asked for one.
pub fn synthesize_success(
    event: &TransactionEvent,
    amount: f64,
    processor_id: &str,
    external_url: Option<String>,
    message: &str,
    data: BTreeMap<String, Value>,
) -> SessionResponse {
    SessionResponse {
        psp_reference: event
            .include_psp_reference
            .then(|| processor_id.to_string()),
        result: event.event_type,
        message: message.to_string(),
        amount,
        actions: transaction_actions(event.event_type),
        external_url,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{TransactionAction, TransactionEventType};
    use crate::domain::processor::ProcessorPaymentStatus;

    #[test]
    fn nested_values_become_strings() {
        let data = scalar_data([
            ("id", json!("pay_1")),
            ("captured", json!(true)),
            ("notes", json!({"checkout_id": "c1"})),
            ("missing", Value::Null),
        ]);
        assert_eq!(data.get("notes"), Some(&json!(r#"{"checkout_id":"c1"}"#)));
        assert_eq!(data.get("captured"), Some(&json!(true)));
        assert!(!data.contains_key("missing"));
    }

    #[test]
    fn psp_reference_follows_event_flag() {
        let mut event = TransactionEvent {
            event_type: TransactionEventType::ChargeSuccess,
            include_psp_reference: true,
        };
        let resp = synthesize_success(&event, 2.0, "pay_1", None, "ok", BTreeMap::new());
        assert_eq!(resp.psp_reference.as_deref(), Some("pay_1"));
        assert_eq!(resp.actions, vec![TransactionAction::Refund, TransactionAction::Cancel]);

        event.include_psp_reference = false;
        let resp = synthesize_success(&event, 2.0, "pay_1", None, "ok", BTreeMap::new());
        assert!(resp.psp_reference.is_none());
        let wire = serde_json::to_value(&resp).unwrap();
        assert!(wire.get("pspReference").is_none());
    }

    #[test]
    fn payment_data_omits_unknown_order() {
        let payment = ProcessorPayment {
            id: "pay_1".to_string(),
            amount: 200,
            currency: "INR".to_string(),
            status: ProcessorPaymentStatus::Captured,
            order_id: None,
            method: Some("upi".to_string()),
        };
        let data = payment_data(&payment);
        assert_eq!(data.get("status"), Some(&json!("captured")));
        assert_eq!(data.get("method"), Some(&json!("upi")));
        assert!(!data.contains_key("orderId"));
    }

    #[test]
    fn dashboard_links_use_entity_segment() {
        assert_eq!(
            dashboard_url("https://dashboard.razorpay.com/app/", DashboardEntity::Payment, "pay_1"),
            "https://dashboard.razorpay.com/app/payments/pay_1"
        );
    }
}

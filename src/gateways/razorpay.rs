use crate::config::RazorpayConfig;
use crate::domain::processor::{CreateOrderRequest, ProcessorOrder, ProcessorPayment, ProcessorRefund};
use crate::gateways::{GatewayError, ProcessorGateway};
use anyhow::Result;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

pub struct RazorpayGateway {
    pub base_url: String,
    pub key_id: String,
    pub key_secret: String,
    pub client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    code: Option<String>,
    description: Option<String>,
}

impl RazorpayGateway {
    pub fn new(config: &RazorpayConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(std::time::Duration::from_millis(timeout_ms));
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
            client: builder.build()?,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let resp = request
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| GatewayError::Decode(e.to_string()));
        }

        let body = resp.text().await.unwrap_or_default();
        Err(rejection(status, &body))
    }
}

fn rejection(status: StatusCode, body: &str) -> GatewayError {
    let (code, description) = match serde_json::from_str::<RazorpayErrorBody>(body) {
        Ok(parsed) => (parsed.error.code, parsed.error.description.unwrap_or_default()),
        Err(_) => (None, body.chars().take(200).collect()),
    };
    let description = if description.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        description
    };

    if status == StatusCode::NOT_FOUND || description.contains("does not exist") {
        return GatewayError::NotFound(description);
    }
    if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
        return GatewayError::Timeout;
    }
    GatewayError::Rejected {
        status: status.as_u16(),
        code,
        description,
    }
}

// Ids are interpolated into the URL path.
fn path_id(id: &str) -> Result<&str, GatewayError> {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        Ok(id)
    } else {
        Err(GatewayError::NotFound(format!("The id provided does not exist: {}", id)))
    }
}

#[async_trait::async_trait]
impl ProcessorGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    fn has_credentials(&self) -> bool {
        !self.key_id.is_empty() && !self.key_secret.is_empty()
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<ProcessorOrder, GatewayError> {
        tracing::debug!(receipt = %request.receipt, amount = request.amount_minor, "razorpay create order");
        let body = json!({
            "amount": request.amount_minor,
            "currency": request.currency,
            "receipt": request.receipt,
            "payment_capture": true,
            "notes": request.notes,
        });
        self.send(self.client.post(format!("{}/v1/orders", self.base_url)).json(&body))
            .await
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<ProcessorPayment, GatewayError> {
        tracing::debug!(payment_id, "razorpay fetch payment");
        let url = format!("{}/v1/payments/{}", self.base_url, path_id(payment_id)?);
        self.send(self.client.get(url)).await
    }

    async fn capture_payment(
        &self,
        payment_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ProcessorPayment, GatewayError> {
        tracing::debug!(payment_id, amount = amount_minor, "razorpay capture payment");
        let url = format!("{}/v1/payments/{}/capture", self.base_url, path_id(payment_id)?);
        let body = json!({ "amount": amount_minor, "currency": currency });
        self.send(self.client.post(url).json(&body)).await
    }

    async fn refund_payment(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<ProcessorRefund, GatewayError> {
        tracing::debug!(payment_id, amount = ?amount_minor, "razorpay refund payment");
        let url = format!("{}/v1/payments/{}/refund", self.base_url, path_id(payment_id)?);
        let body = match amount_minor {
            Some(amount) => json!({ "amount": amount }),
            None => json!({}),
        };
        self.send(self.client.post(url).json(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_missing_entities_to_not_found() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"The id provided does not exist"}}"#;
        assert!(matches!(rejection(StatusCode::BAD_REQUEST, body), GatewayError::NotFound(_)));
    }

    #[test]
    fn keeps_processor_code_and_description() {
        let body = r#"{"error":{"code":"BAD_REQUEST_ERROR","description":"Capture amount must be equal to the amount authorized"}}"#;
        match rejection(StatusCode::BAD_REQUEST, body) {
            GatewayError::Rejected { status, code, description } => {
                assert_eq!(status, 400);
                assert_eq!(code.as_deref(), Some("BAD_REQUEST_ERROR"));
                assert!(description.starts_with("Capture amount"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn falls_back_to_status_for_empty_bodies() {
        let err = rejection(StatusCode::BAD_GATEWAY, "");
        assert_eq!(err.to_string(), "HTTP 502");
    }

    #[test]
    fn path_ids_must_be_plain() {
        assert!(path_id("pay_29QQoUBi66xm2f").is_ok());
        assert!(path_id("../orders").is_err());
        assert!(path_id("").is_err());
    }
}

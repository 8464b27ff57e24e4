use crate::domain::processor::{
    CreateOrderRequest, ProcessorOrder, ProcessorPayment, ProcessorPaymentStatus, ProcessorRefund,
};
use crate::gateways::{GatewayError, ProcessorGateway};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    AlwaysSuccess,
    AlwaysFailure,
    AlwaysTimeout,
}

impl MockBehavior {
    pub fn parse(s: &str) -> Self {
        match s {
            "ALWAYS_FAILURE" => MockBehavior::AlwaysFailure,
            "ALWAYS_TIMEOUT" => MockBehavior::AlwaysTimeout,
            _ => MockBehavior::AlwaysSuccess,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreateOrder(CreateOrderRequest),
    FetchPayment(String),
    CapturePayment {
        payment_id: String,
        amount_minor: i64,
        currency: String,
    },
    RefundPayment {
        payment_id: String,
        amount_minor: Option<i64>,
    },
}

#[derive(Default)]
struct MockState {
    payments: HashMap<String, ProcessorPayment>,
    calls: Vec<GatewayCall>,
}

/// In-memory processor that mirrors Razorpay's capture and refund rules closely enough
/// for local runs, and records every call it receives.
pub struct MockGateway {
    pub behavior: MockBehavior,
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn with_payment(self, payment: ProcessorPayment) -> Self {
        self.insert_payment(payment);
        self
    }

    pub fn insert_payment(&self, payment: ProcessorPayment) {
        self.state().payments.insert(payment.id.clone(), payment);
    }

    pub fn payment(&self, payment_id: &str) -> Option<ProcessorPayment> {
        self.state().payments.get(payment_id).cloned()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state().calls.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, call: GatewayCall) -> Result<MutexGuard<'_, MockState>, GatewayError> {
        let mut state = self.state();
        state.calls.push(call);
        match self.behavior {
            MockBehavior::AlwaysSuccess => Ok(state),
            MockBehavior::AlwaysFailure => Err(GatewayError::Rejected {
                status: 400,
                code: Some("MOCK_DECLINED".to_string()),
                description: "mock decline".to_string(),
            }),
            MockBehavior::AlwaysTimeout => Err(GatewayError::Timeout),
        }
    }
}

fn not_found(id: &str) -> GatewayError {
    GatewayError::NotFound(format!("The id provided does not exist: {}", id))
}

fn bad_request(description: &str) -> GatewayError {
    GatewayError::Rejected {
        status: 400,
        code: Some("BAD_REQUEST_ERROR".to_string()),
        description: description.to_string(),
    }
}

#[async_trait::async_trait]
impl ProcessorGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn has_credentials(&self) -> bool {
        true
    }

    async fn create_order(&self, request: CreateOrderRequest) -> Result<ProcessorOrder, GatewayError> {
        drop(self.begin(GatewayCall::CreateOrder(request.clone()))?);
        Ok(ProcessorOrder {
            id: format!("order_mock_{}", uuid::Uuid::new_v4().simple()),
            amount: request.amount_minor,
            currency: request.currency,
            receipt: Some(request.receipt),
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<ProcessorPayment, GatewayError> {
        let state = self.begin(GatewayCall::FetchPayment(payment_id.to_string()))?;
        state
            .payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| not_found(payment_id))
    }

    async fn capture_payment(
        &self,
        payment_id: &str,
        amount_minor: i64,
        currency: &str,
    ) -> Result<ProcessorPayment, GatewayError> {
        let mut state = self.begin(GatewayCall::CapturePayment {
            payment_id: payment_id.to_string(),
            amount_minor,
            currency: currency.to_string(),
        })?;
        let payment = state
            .payments
            .get_mut(payment_id)
            .ok_or_else(|| not_found(payment_id))?;

        match payment.status {
            ProcessorPaymentStatus::Authorized => {}
            ProcessorPaymentStatus::Captured => {
                return Err(bad_request("This payment has already been captured"))
            }
            _ => {
                return Err(bad_request(
                    "Only payments which have been authorized and not yet captured can be captured",
                ))
            }
        }
        if payment.amount != amount_minor {
            return Err(bad_request("Capture amount must be equal to the amount authorized"));
        }
        if payment.currency != currency {
            return Err(bad_request("Currency does not match the payment currency"));
        }

        payment.status = ProcessorPaymentStatus::Captured;
        Ok(payment.clone())
    }

    async fn refund_payment(
        &self,
        payment_id: &str,
        amount_minor: Option<i64>,
    ) -> Result<ProcessorRefund, GatewayError> {
        let mut state = self.begin(GatewayCall::RefundPayment {
            payment_id: payment_id.to_string(),
            amount_minor,
        })?;
        let payment = state
            .payments
            .get_mut(payment_id)
            .ok_or_else(|| not_found(payment_id))?;

        if payment.status != ProcessorPaymentStatus::Captured {
            return Err(bad_request("The payment has not been captured or is fully refunded"));
        }
        let amount = amount_minor.unwrap_or(payment.amount);
        if amount > payment.amount {
            return Err(bad_request("The refund amount provided is greater than amount captured"));
        }
        if amount == payment.amount {
            payment.status = ProcessorPaymentStatus::Refunded;
        }

        Ok(ProcessorRefund {
            id: format!("rfnd_mock_{}", uuid::Uuid::new_v4().simple()),
            amount,
            currency: payment.currency.clone(),
            status: "processed".to_string(),
            payment_id: Some(payment.id.clone()),
        })
    }
}

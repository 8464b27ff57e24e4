use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionEventType {
    ChargeSuccess,
    ChargeFailure,
    AuthorizationSuccess,
    AuthorizationFailure,
    RefundSuccess,
    RefundFailure,
    CancelSuccess,
    CancelFailure,
}

impl TransactionEventType {
    pub const ALL: [TransactionEventType; 8] = [
        TransactionEventType::ChargeSuccess,
        TransactionEventType::ChargeFailure,
        TransactionEventType::AuthorizationSuccess,
        TransactionEventType::AuthorizationFailure,
        TransactionEventType::RefundSuccess,
        TransactionEventType::RefundFailure,
        TransactionEventType::CancelSuccess,
        TransactionEventType::CancelFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChargeSuccess => "CHARGE_SUCCESS",
            Self::ChargeFailure => "CHARGE_FAILURE",
            Self::AuthorizationSuccess => "AUTHORIZATION_SUCCESS",
            Self::AuthorizationFailure => "AUTHORIZATION_FAILURE",
            Self::RefundSuccess => "REFUND_SUCCESS",
            Self::RefundFailure => "REFUND_FAILURE",
            Self::CancelSuccess => "CANCEL_SUCCESS",
            Self::CancelFailure => "CANCEL_FAILURE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// The action family this result belongs to.
    pub fn action(&self) -> TransactionAction {
        match self {
            Self::ChargeSuccess | Self::ChargeFailure => TransactionAction::Charge,
            Self::AuthorizationSuccess | Self::AuthorizationFailure => {
                TransactionAction::Authorization
            }
            Self::RefundSuccess | Self::RefundFailure => TransactionAction::Refund,
            Self::CancelSuccess | Self::CancelFailure => TransactionAction::Cancel,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ChargeFailure
                | Self::AuthorizationFailure
                | Self::RefundFailure
                | Self::CancelFailure
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionAction {
    Charge,
    Authorization,
    Refund,
    Cancel,
}

impl TransactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Charge => "CHARGE",
            Self::Authorization => "AUTHORIZATION",
            Self::Refund => "REFUND",
            Self::Cancel => "CANCEL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [Self::Charge, Self::Authorization, Self::Refund, Self::Cancel]
            .into_iter()
            .find(|a| a.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionEvent {
    pub event_type: TransactionEventType,
    pub include_psp_reference: bool,
}

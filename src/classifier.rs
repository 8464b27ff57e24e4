use crate::domain::event::{TransactionAction, TransactionEventType};
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Initialize,
    Process,
    ChargeRequested,
    RefundRequested,
    CancelRequested,
}

impl SessionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "TRANSACTION_INITIALIZE_SESSION",
            Self::Process => "TRANSACTION_PROCESS_SESSION",
            Self::ChargeRequested => "TRANSACTION_CHARGE_REQUESTED",
            Self::RefundRequested => "TRANSACTION_REFUND_REQUESTED",
            Self::CancelRequested => "TRANSACTION_CANCELATION_REQUESTED",
        }
    }

    pub fn allowed_actions(&self) -> &'static [TransactionAction] {
        match self {
            Self::Initialize | Self::Process => {
                &[TransactionAction::Charge, TransactionAction::Authorization]
            }
            Self::ChargeRequested => &[TransactionAction::Charge],
            Self::RefundRequested => &[TransactionAction::Refund],
            Self::CancelRequested => &[TransactionAction::Cancel],
        }
    }

    pub fn default_action(&self) -> TransactionAction {
        self.allowed_actions()[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorOperation {
    CreateOrder,
    CaptureOrFetch,
    Refund,
    /// No processor call; the processor cannot void authorized or captured funds.
    Cancel,
}

pub fn classify(
    action: TransactionAction,
    stage: SessionStage,
) -> Result<ProcessorOperation, ValidationError> {
    if !stage.allowed_actions().contains(&action) {
        return Err(ValidationError::new(
            "action",
            format!("{} is not supported by {}", action.as_str(), stage.as_str()),
        ));
    }

    Ok(match stage {
        SessionStage::Initialize => ProcessorOperation::CreateOrder,
        SessionStage::Process | SessionStage::ChargeRequested => ProcessorOperation::CaptureOrFetch,
        SessionStage::RefundRequested => ProcessorOperation::Refund,
        SessionStage::CancelRequested => ProcessorOperation::Cancel,
    })
}

pub fn failure_result(action: TransactionAction) -> TransactionEventType {
    match action {
        TransactionAction::Charge => TransactionEventType::ChargeFailure,
        TransactionAction::Authorization => TransactionEventType::AuthorizationFailure,
        TransactionAction::Refund => TransactionEventType::RefundFailure,
        TransactionAction::Cancel => TransactionEventType::CancelFailure,
    }
}

/// Action used to pick the failure result when the request could not be validated.
/// Falls back to the stage default when the requested action is absent or foreign
/// to the stage.
pub fn failure_action(stage: SessionStage, requested: Option<TransactionAction>) -> TransactionAction {
    requested
        .filter(|a| stage.allowed_actions().contains(a))
        .unwrap_or_else(|| stage.default_action())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_operations() {
        let cases = [
            (TransactionAction::Charge, SessionStage::Initialize, ProcessorOperation::CreateOrder),
            (TransactionAction::Authorization, SessionStage::Initialize, ProcessorOperation::CreateOrder),
            (TransactionAction::Charge, SessionStage::Process, ProcessorOperation::CaptureOrFetch),
            (TransactionAction::Charge, SessionStage::ChargeRequested, ProcessorOperation::CaptureOrFetch),
            (TransactionAction::Refund, SessionStage::RefundRequested, ProcessorOperation::Refund),
            (TransactionAction::Cancel, SessionStage::CancelRequested, ProcessorOperation::Cancel),
        ];
        for (action, stage, op) in cases {
            assert_eq!(classify(action, stage).unwrap(), op);
        }
    }

    #[test]
    fn rejects_foreign_action_for_stage() {
        let err = classify(TransactionAction::Refund, SessionStage::Initialize).unwrap_err();
        assert_eq!(err.field, "action");
        assert!(classify(TransactionAction::Authorization, SessionStage::ChargeRequested).is_err());
    }

    #[test]
    fn failure_result_stays_in_family() {
        for action in [
            TransactionAction::Charge,
            TransactionAction::Authorization,
            TransactionAction::Refund,
            TransactionAction::Cancel,
        ] {
            let result = failure_result(action);
            assert!(result.is_failure());
            assert_eq!(result.action(), action);
        }
    }

    #[test]
    fn failure_action_ignores_foreign_requests() {
        assert_eq!(
            failure_action(SessionStage::Initialize, Some(TransactionAction::Refund)),
            TransactionAction::Charge
        );
        assert_eq!(
            failure_action(SessionStage::Process, Some(TransactionAction::Authorization)),
            TransactionAction::Authorization
        );
        assert_eq!(failure_action(SessionStage::RefundRequested, None), TransactionAction::Refund);
    }
}

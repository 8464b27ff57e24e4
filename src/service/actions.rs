use crate::domain::event::{TransactionAction, TransactionEventType};

/// Follow-up actions the platform may request after a given result.
pub fn transaction_actions(result: TransactionEventType) -> Vec<TransactionAction> {
    match result {
        TransactionEventType::ChargeSuccess | TransactionEventType::AuthorizationSuccess => {
            vec![TransactionAction::Refund, TransactionAction::Cancel]
        }
        TransactionEventType::RefundSuccess | TransactionEventType::CancelSuccess => Vec::new(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_charges_allow_refund_and_cancel() {
        for result in [
            TransactionEventType::ChargeSuccess,
            TransactionEventType::AuthorizationSuccess,
        ] {
            assert_eq!(
                transaction_actions(result),
                vec![TransactionAction::Refund, TransactionAction::Cancel]
            );
        }
    }

    #[test]
    fn terminal_and_failed_results_allow_nothing() {
        for result in TransactionEventType::ALL {
            if matches!(
                result,
                TransactionEventType::ChargeSuccess | TransactionEventType::AuthorizationSuccess
            ) {
                continue;
            }
            assert!(transaction_actions(result).is_empty(), "{:?}", result);
        }
    }
}

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const MAX_RECEIPT_LEN: usize = 40;

/// Processor receipts are capped at 40 characters. Short ids pass through so retries
/// with the same transaction id reuse the same receipt; longer ids are replaced by a
/// truncated content hash.
pub fn build_receipt(transaction_id: &str) -> String {
    if transaction_id.len() <= MAX_RECEIPT_LEN {
        return transaction_id.to_string();
    }
    let digest = format!("{:x}", Sha256::digest(transaction_id.as_bytes()));
    digest[..MAX_RECEIPT_LEN].to_string()
}

/// `checkout_id` keeps the untruncated id recoverable from the processor dashboard.
pub fn order_notes(transaction_id: &str, idempotency_key: Option<&str>) -> BTreeMap<String, String> {
    let mut notes = BTreeMap::new();
    notes.insert("checkout_id".to_string(), transaction_id.to_string());
    if let Some(key) = idempotency_key {
        notes.insert("idempotency_key".to_string(), key.to_string());
    }
    notes
}

//! `TxRecord`: canonical transaction hashing, shared by value (not by
//! dependency) with `qc-raw-ingestor`, which needs the same digest before a
//! transaction ever reaches a block. Both copies must stay byte-identical;
//! keeping the algorithm here rather than importing the ingestor avoids a
//! dependency edge from block assembly back to ingestion.

use shared_types::{Hash, Transaction};
use std::collections::BTreeMap;

/// Canonical, sorted-keys, whitespace-free JSON preimage of a transaction,
/// hex-encoding every byte field.
#[must_use]
pub fn canonical_preimage(tx: &Transaction) -> Vec<u8> {
    let mut fields: BTreeMap<&'static str, serde_json::Value> = BTreeMap::new();
    fields.insert("from", serde_json::Value::String(hex::encode(tx.from)));
    fields.insert(
        "to",
        match tx.to {
            Some(to) => serde_json::Value::String(hex::encode(to)),
            None => serde_json::Value::Null,
        },
    );
    fields.insert("amount", serde_json::Value::from(tx.amount));
    fields.insert("fee", serde_json::Value::from(tx.fee));
    fields.insert("nonce", serde_json::Value::from(tx.nonce));
    fields.insert(
        "gas_limit",
        tx.gas_limit
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null),
    );
    fields.insert(
        "gas_price",
        tx.gas_price
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null),
    );
    fields.insert("data", serde_json::Value::String(hex::encode(&tx.data)));
    fields.insert(
        "signature",
        serde_json::Value::String(hex::encode(tx.signature)),
    );
    serde_json::to_vec(&fields).expect("BTreeMap of scalars always serializes")
}

/// `TxRecord::hash()`: `digest(canonicalPreimage(tx))`.
#[must_use]
pub fn hash(tx: &Transaction) -> Hash {
    qc_crypto::digest(&canonical_preimage(tx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Transaction {
        Transaction {
            from: [1u8; 20],
            to: Some([2u8; 20]),
            amount: 100,
            fee: 1,
            nonce: 0,
            gas_limit: Some(21_000),
            gas_price: Some(10),
            data: vec![],
            signature: [0u8; 65],
            hash: [0u8; 32],
        }
    }

    #[test]
    fn hash_is_deterministic_and_ignores_the_hash_field_itself() {
        let mut tx = sample();
        let h1 = hash(&tx);
        tx.hash = [9u8; 32];
        let h2 = hash(&tx);
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_nonce_changes_hash() {
        let mut tx = sample();
        let h1 = hash(&tx);
        tx.nonce = 1;
        assert_ne!(h1, hash(&tx));
    }
}

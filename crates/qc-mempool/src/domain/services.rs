//! Domain services: free functions usable outside the pool's own bookkeeping.

use super::entities::PooledTransaction;

/// Minimum fee required for Replace-by-Fee: `old_fee * (100 + bump) / 100`.
#[must_use]
pub fn calculate_rbf_min_fee(old_fee: u64, bump_percent: u64) -> u64 {
    old_fee * (100 + bump_percent) / 100
}

/// Whether `new_fee` clears the RBF minimum bump over `old_fee`.
#[must_use]
pub fn is_valid_rbf_bump(old_fee: u64, new_fee: u64, bump_percent: u64) -> bool {
    new_fee >= calculate_rbf_min_fee(old_fee, bump_percent)
}

/// Whether `nonces` form a contiguous run starting at `start_nonce`, once
/// sorted. Used to sanity-check a proposed batch before signing.
#[must_use]
pub fn validate_nonce_sequence(transactions: &[&PooledTransaction], start_nonce: u64) -> bool {
    let mut nonces: Vec<u64> = transactions.iter().map(|t| t.entry.tx.nonce).collect();
    nonces.sort_unstable();
    nonces
        .iter()
        .enumerate()
        .all(|(i, nonce)| *nonce == start_nonce + i as u64)
}

/// Sum of gas limits across a set of transactions (entries without a gas
/// limit contribute zero).
#[must_use]
pub fn total_gas(transactions: &[&PooledTransaction]) -> u64 {
    transactions
        .iter()
        .map(|t| t.entry.tx.gas_limit.unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{PooledTransaction, Transaction};

    fn tx(nonce: u64, fee: u64) -> PooledTransaction {
        let transaction = Transaction {
            from: [0xAA; 20],
            to: Some([0xBB; 20]),
            amount: 0,
            fee,
            nonce,
            gas_limit: Some(21_000),
            gas_price: None,
            data: vec![],
            signature: [0u8; 65],
            hash: [nonce as u8; 32],
        };
        PooledTransaction::new(transaction, fee / 21_000, 1000, 3600)
    }

    #[test]
    fn rbf_min_fee_matches_bump_percent() {
        assert_eq!(calculate_rbf_min_fee(1_000_000_000, 10), 1_100_000_000);
        assert_eq!(calculate_rbf_min_fee(2_000_000_000, 25), 2_500_000_000);
    }

    #[test]
    fn rbf_bump_rejects_insufficient_increase() {
        assert!(!is_valid_rbf_bump(1_000_000_000, 1_050_000_000, 10));
        assert!(is_valid_rbf_bump(1_000_000_000, 1_100_000_000, 10));
    }

    #[test]
    fn nonce_sequence_detects_gap() {
        let t0 = tx(0, 1000);
        let t2 = tx(2, 1000);
        let txs: Vec<&PooledTransaction> = vec![&t0, &t2];
        assert!(!validate_nonce_sequence(&txs, 0));
    }

    #[test]
    fn nonce_sequence_accepts_contiguous_run() {
        let t0 = tx(0, 1000);
        let t1 = tx(1, 1000);
        let txs: Vec<&PooledTransaction> = vec![&t0, &t1];
        assert!(validate_nonce_sequence(&txs, 0));
    }

    #[test]
    fn total_gas_sums_limits() {
        let t0 = tx(0, 1000);
        let t1 = tx(1, 1000);
        let txs: Vec<&PooledTransaction> = vec![&t0, &t1];
        assert_eq!(total_gas(&txs), 42_000);
    }
}

//! Service orchestration: decode → recover → admit → publish, with
//! idempotent resubmission keyed on the raw transaction hash.

use crate::domain::{decode_raw_transaction, IngestError};
use crate::ports::{IngestOutcome, MempoolSink, RawIngestorApi};
use crate::adapters::IngestEventPublisher;
use shared_types::{Address, Hash};
use std::collections::HashMap;

/// Default raw ingestor: decodes and recovers via the domain layer, hands
/// accepted transactions to a `MempoolSink`, and publishes `tx.received`.
///
/// Idempotency cache: a second submission of the same raw bytes returns
/// the previously accepted hash rather than re-submitting to the mempool.
pub struct RawIngestorService<M: MempoolSink, P: IngestEventPublisher> {
    mempool: M,
    publisher: P,
    seen: HashMap<Hash, Hash>,
}

impl<M: MempoolSink, P: IngestEventPublisher> RawIngestorService<M, P> {
    /// Creates a new service over the given mempool sink and publisher.
    pub fn new(mempool: M, publisher: P) -> Self {
        Self {
            mempool,
            publisher,
            seen: HashMap::new(),
        }
    }
}

impl<M: MempoolSink, P: IngestEventPublisher> RawIngestorApi for RawIngestorService<M, P> {
    fn ingest(
        &mut self,
        raw_hex: &str,
        expected_from: Option<Address>,
    ) -> Result<IngestOutcome, IngestError> {
        let decoded = decode_raw_transaction(raw_hex, expected_from)?;

        if let Some(&tx_hash) = self.seen.get(&decoded.raw_tx_hash) {
            tracing::debug!(raw_tx_hash = ?decoded.raw_tx_hash, "idempotent resubmission");
            return Ok(IngestOutcome {
                tx_hash,
                raw_tx_hash: decoded.raw_tx_hash,
                idempotent_replay: true,
            });
        }

        let tx_hash = decoded.transaction.hash;
        self.mempool
            .submit(decoded.transaction)
            .map_err(|e| IngestError::MempoolRejected(e.to_string()))?;

        self.seen.insert(decoded.raw_tx_hash, tx_hash);

        if let Err(e) = self.publisher.publish_tx_received(tx_hash, decoded.raw_tx_hash) {
            tracing::warn!(error = %e, "failed to publish tx.received");
        }

        Ok(IngestOutcome {
            tx_hash,
            raw_tx_hash: decoded.raw_tx_hash,
            idempotent_replay: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::publisher::RecordingPublisher;
    use crate::ports::outbound::RecordingMempoolSink;
    use qc_crypto::KeyPair;
    use rlp::RlpStream;

    fn sign_legacy_tx(keypair: &KeyPair, nonce: u64) -> String {
        let to = [0xBBu8; 20];
        let gas_price = 1_000u64;
        let gas_limit = 21_000u64;
        let value = 50u64;
        let data: Vec<u8> = vec![];

        let mut unsigned = RlpStream::new();
        unsigned.begin_list(6);
        unsigned.append(&nonce);
        unsigned.append(&gas_price);
        unsigned.append(&gas_limit);
        unsigned.append(&to.to_vec());
        unsigned.append(&value);
        unsigned.append(&data);
        let message = qc_crypto::keccak256(&unsigned.out());
        let signature = keypair.sign(&message).unwrap();

        let mut signed = RlpStream::new();
        signed.begin_list(9);
        signed.append(&nonce);
        signed.append(&gas_price);
        signed.append(&gas_limit);
        signed.append(&to.to_vec());
        signed.append(&value);
        signed.append(&data);
        signed.append(&(27u64 + signature[64] as u64));
        signed.append(&signature[..32].to_vec());
        signed.append(&signature[32..64].to_vec());

        format!("0x{}", hex::encode(signed.out()))
    }

    #[test]
    fn ingest_accepts_and_publishes() {
        let keypair = KeyPair::generate();
        let mut svc = RawIngestorService::new(RecordingMempoolSink::new(), RecordingPublisher::new());

        let outcome = svc.ingest(&sign_legacy_tx(&keypair, 0), None).unwrap();
        assert!(!outcome.idempotent_replay);
        assert_eq!(svc.mempool.accepted.len(), 1);
        assert_eq!(svc.publisher.tx_received.lock().unwrap().len(), 1);
    }

    #[test]
    fn second_submission_is_idempotent() {
        let keypair = KeyPair::generate();
        let mut svc = RawIngestorService::new(RecordingMempoolSink::new(), RecordingPublisher::new());
        let raw = sign_legacy_tx(&keypair, 0);

        let first = svc.ingest(&raw, None).unwrap();
        let second = svc.ingest(&raw, None).unwrap();

        assert!(!first.idempotent_replay);
        assert!(second.idempotent_replay);
        assert_eq!(first.tx_hash, second.tx_hash);
        assert_eq!(svc.mempool.accepted.len(), 1, "no duplicate mempool submission");
    }

    #[test]
    fn mempool_rejection_surfaces_as_ingest_error() {
        let keypair = KeyPair::generate();
        let mut mempool = RecordingMempoolSink::new();
        mempool.reject_all = true;
        let mut svc = RawIngestorService::new(mempool, RecordingPublisher::new());

        let result = svc.ingest(&sign_legacy_tx(&keypair, 0), None);
        assert!(matches!(result, Err(IngestError::MempoolRejected(_))));
    }
}

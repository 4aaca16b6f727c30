//! Decoding of externally-signed, RLP-encoded transactions (legacy and
//! EIP-1559 typed-2 envelopes) and derivation of the canonical internal
//! [`Transaction`].
//!
//! Grounded on the RLP transaction layouts used by `reth`/`ethrex`-style
//! clients in `other_examples/`; `qc-crypto::ecdsa` supplies signature
//! recovery (no signature-checking logic is duplicated here).

use crate::domain::errors::IngestError;
use qc_crypto::{keccak256, recover_address, AddressBytes, SignatureBytes};
use rlp::Rlp;
use shared_types::{Address, Hash, Transaction};
use std::collections::BTreeMap;

/// Transaction type byte for an EIP-1559 typed envelope.
const EIP1559_TYPE: u8 = 0x02;

/// Result of successfully decoding a raw transaction: the canonical
/// internal transaction plus the hash of the original raw bytes (kept for
/// cross-reference and idempotency).
pub struct DecodedTransaction {
    /// The internal transaction, ready for `MempoolApi::add_transaction`.
    pub transaction: Transaction,
    /// `digest(raw_bytes)` — the uniqueness key for idempotent resubmission.
    pub raw_tx_hash: Hash,
}

/// Decode a hex-encoded raw transaction (with or without a `0x` prefix),
/// recover its sender, and derive the canonical [`Transaction`].
///
/// `expected_from`, if given, must match the recovered sender or decoding
/// fails with [`IngestError::SignatureError`].
pub fn decode_raw_transaction(
    raw_hex: &str,
    expected_from: Option<Address>,
) -> Result<DecodedTransaction, IngestError> {
    let bytes = decode_hex(raw_hex)?;
    if bytes.is_empty() {
        return Err(IngestError::ParseError("empty transaction payload".into()));
    }
    let raw_tx_hash = qc_crypto::digest(&bytes);

    let fields = if bytes[0] == EIP1559_TYPE {
        decode_eip1559(&bytes[1..])?
    } else if bytes[0] <= 0x7f {
        return Err(IngestError::UnsupportedType(bytes[0]));
    } else {
        decode_legacy(&bytes)?
    };

    let from = recover_sender(&fields)?;
    if let Some(expected) = expected_from {
        if expected != from {
            return Err(IngestError::SignatureError(format!(
                "recovered sender 0x{} does not match supplied from address",
                hex::encode(from)
            )));
        }
    }

    let transaction = Transaction {
        from,
        to: fields.to,
        amount: fields.value,
        fee: fields
            .effective_gas_price
            .saturating_mul(fields.gas_limit),
        nonce: fields.nonce,
        gas_limit: Some(fields.gas_limit),
        gas_price: Some(fields.effective_gas_price),
        data: fields.data.clone(),
        signature: fields.signature,
        hash: [0u8; 32], // filled in below, after `from` is known
    };
    let hash = canonical_hash(&transaction);

    Ok(DecodedTransaction {
        transaction: Transaction { hash, ..transaction },
        raw_tx_hash,
    })
}

/// Fields common to both legacy and typed transactions once the
/// type-specific envelope has been unpacked, plus the pieces needed to
/// reconstruct the signed preimage for recovery.
struct RawFields {
    to: Option<Address>,
    value: u64,
    gas_limit: u64,
    effective_gas_price: u64,
    nonce: u64,
    data: Vec<u8>,
    signature: SignatureBytes,
    signing_preimage: Vec<u8>,
}

fn decode_legacy(bytes: &[u8]) -> Result<RawFields, IngestError> {
    let rlp = Rlp::new(bytes);
    if rlp.item_count().map_err(rlp_err)? != 9 {
        return Err(IngestError::ParseError(
            "legacy transaction must have 9 RLP fields".into(),
        ));
    }
    let nonce: u64 = rlp.val_at(0).map_err(rlp_err)?;
    let gas_price: u64 = rlp.val_at(1).map_err(rlp_err)?;
    let gas_limit: u64 = rlp.val_at(2).map_err(rlp_err)?;
    let to = decode_to(&rlp, 3)?;
    let value: u64 = rlp.val_at(4).map_err(rlp_err)?;
    let data: Vec<u8> = rlp.val_at(5).map_err(rlp_err)?;
    let v: u64 = rlp.val_at(6).map_err(rlp_err)?;
    let r: Vec<u8> = rlp.val_at(7).map_err(rlp_err)?;
    let s: Vec<u8> = rlp.val_at(8).map_err(rlp_err)?;

    let (recovery_id, chain_id) = legacy_recovery_id(v)?;
    let signature = pack_signature(&r, &s, recovery_id)?;

    let mut stream = rlp::RlpStream::new();
    match chain_id {
        Some(chain_id) => {
            stream.begin_list(9);
            stream.append(&nonce);
            stream.append(&gas_price);
            stream.append(&gas_limit);
            append_to(&mut stream, to);
            stream.append(&value);
            stream.append(&data);
            stream.append(&chain_id);
            stream.append(&0u8);
            stream.append(&0u8);
        }
        None => {
            stream.begin_list(6);
            stream.append(&nonce);
            stream.append(&gas_price);
            stream.append(&gas_limit);
            append_to(&mut stream, to);
            stream.append(&value);
            stream.append(&data);
        }
    }

    Ok(RawFields {
        to,
        value,
        gas_limit,
        effective_gas_price: gas_price,
        nonce,
        data,
        signature,
        signing_preimage: stream.out().to_vec(),
    })
}

fn decode_eip1559(payload: &[u8]) -> Result<RawFields, IngestError> {
    let rlp = Rlp::new(payload);
    if rlp.item_count().map_err(rlp_err)? != 12 {
        return Err(IngestError::ParseError(
            "EIP-1559 transaction must have 12 RLP fields".into(),
        ));
    }
    let chain_id: u64 = rlp.val_at(0).map_err(rlp_err)?;
    let nonce: u64 = rlp.val_at(1).map_err(rlp_err)?;
    let max_priority_fee: u64 = rlp.val_at(2).map_err(rlp_err)?;
    let max_fee: u64 = rlp.val_at(3).map_err(rlp_err)?;
    let gas_limit: u64 = rlp.val_at(4).map_err(rlp_err)?;
    let to = decode_to(&rlp, 5)?;
    let value: u64 = rlp.val_at(6).map_err(rlp_err)?;
    let data: Vec<u8> = rlp.val_at(7).map_err(rlp_err)?;
    // access_list (index 8) carried through unparsed; this node does not
    // execute EVM code and has no use for access-list gas pre-warming.
    let y_parity: u8 = rlp.val_at(9).map_err(rlp_err)?;
    let r: Vec<u8> = rlp.val_at(10).map_err(rlp_err)?;
    let s: Vec<u8> = rlp.val_at(11).map_err(rlp_err)?;

    let signature = pack_signature(&r, &s, y_parity)?;

    let mut stream = rlp::RlpStream::new();
    stream.begin_list(9);
    stream.append(&chain_id);
    stream.append(&nonce);
    stream.append(&max_priority_fee);
    stream.append(&max_fee);
    stream.append(&gas_limit);
    append_to(&mut stream, to);
    stream.append(&value);
    stream.append(&data);
    stream.begin_list(0); // empty access list

    let mut signing_preimage = vec![EIP1559_TYPE];
    signing_preimage.extend_from_slice(stream.out().as_ref());

    // Effective gas price, derived from {maxFeePerGas, maxPriorityFeePerGas}
    // absent a base fee oracle: the smaller of the two caps.
    let effective_gas_price = max_priority_fee.min(max_fee);

    Ok(RawFields {
        to,
        value,
        gas_limit,
        effective_gas_price,
        nonce,
        data,
        signature,
        signing_preimage,
    })
}

fn decode_to(rlp: &Rlp<'_>, index: usize) -> Result<Option<Address>, IngestError> {
    let raw: Vec<u8> = rlp.val_at(index).map_err(rlp_err)?;
    if raw.is_empty() {
        return Ok(None);
    }
    if raw.len() != 20 {
        return Err(IngestError::ParseError(format!(
            "`to` address must be 20 bytes, got {}",
            raw.len()
        )));
    }
    let mut address = [0u8; 20];
    address.copy_from_slice(&raw);
    Ok(Some(address))
}

fn append_to(stream: &mut rlp::RlpStream, to: Option<Address>) {
    match to {
        Some(address) => {
            stream.append(&address.to_vec());
        }
        None => {
            stream.append_empty_data();
        }
    }
}

/// Legacy `v` decoding: pre-EIP-155 uses `{27, 28}`; EIP-155 encodes the
/// chain id as `v = recovery_id + 35 + chain_id * 2`.
fn legacy_recovery_id(v: u64) -> Result<(u8, Option<u64>), IngestError> {
    match v {
        27 => Ok((0, None)),
        28 => Ok((1, None)),
        v if v >= 35 => {
            let chain_id = (v - 35) / 2;
            let recovery_id = ((v - 35) % 2) as u8;
            Ok((recovery_id, Some(chain_id)))
        }
        other => Err(IngestError::ParseError(format!(
            "unrecognized signature `v` value: {other}"
        ))),
    }
}

fn pack_signature(r: &[u8], s: &[u8], recovery_id: u8) -> Result<SignatureBytes, IngestError> {
    if r.len() > 32 || s.len() > 32 {
        return Err(IngestError::ParseError(
            "signature r/s component exceeds 32 bytes".into(),
        ));
    }
    if recovery_id > 1 {
        return Err(IngestError::ParseError(format!(
            "invalid recovery id: {recovery_id}"
        )));
    }
    let mut signature = [0u8; 65];
    signature[32 - r.len()..32].copy_from_slice(r);
    signature[64 - s.len()..64].copy_from_slice(s);
    signature[64] = recovery_id;
    Ok(signature)
}

fn recover_sender(fields: &RawFields) -> Result<AddressBytes, IngestError> {
    let message = keccak256(&fields.signing_preimage);
    recover_address(&message, &fields.signature)
        .map_err(|e| IngestError::SignatureError(e.to_string()))
}

fn decode_hex(raw_hex: &str) -> Result<Vec<u8>, IngestError> {
    let trimmed = raw_hex.strip_prefix("0x").unwrap_or(raw_hex);
    hex::decode(trimmed).map_err(|e| IngestError::ParseError(e.to_string()))
}

fn rlp_err(e: rlp::DecoderError) -> IngestError {
    IngestError::ParseError(e.to_string())
}

/// Canonical JSON serialization with sorted keys, no whitespace, hex fields
/// without a `0x` prefix — matches the RBF/priority hashing the rest of
/// the node relies on for content addressing.
fn canonical_hash(tx: &Transaction) -> Hash {
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

    let canonical = serde_json::to_string(&fields).expect("BTreeMap of scalars always serializes");
    qc_crypto::digest(canonical.as_bytes())
}

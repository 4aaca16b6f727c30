//! `X-Broadcast-Signature`: HMAC-SHA256 over the wire body, hex-encoded.

pub fn sign_body(secret: &[u8], body: &[u8]) -> String {
    hex::encode(qc_crypto::hmac_sha256(secret, body))
}

pub fn verify_body(secret: &[u8], body: &[u8], signature_hex: &str) -> bool {
    let Ok(raw) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(tag): Result<[u8; 32], _> = raw.try_into() else {
        return false;
    };
    qc_crypto::hmac_sha256_verify(secret, body, &tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let secret = b"shared-secret";
        let body = b"{\"id\":\"abc\"}";
        let sig = sign_body(secret, body);
        assert!(verify_body(secret, body, &sig));
    }

    #[test]
    fn tampered_body_fails_verification() {
        let secret = b"shared-secret";
        let sig = sign_body(secret, b"original");
        assert!(!verify_body(secret, b"tampered", &sig));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let body = b"body";
        let sig = sign_body(b"secret-a", body);
        assert!(!verify_body(b"secret-b", body, &sig));
    }
}

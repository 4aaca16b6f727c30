//! Outbound (driven) ports for the consensus subsystem.

/// Time source for consistent, testable timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in seconds since the UNIX epoch.
    fn now(&self) -> u64;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Supplies the local node's signing key material: an ECDSA keypair when
/// this node has one, and the network-shared HMAC secret used as a
/// fallback for validators that don't.
pub trait SigningKeySource: Send + Sync {
    /// The local node's ECDSA keypair, if configured.
    fn ecdsa_key(&self) -> Option<&qc_crypto::KeyPair>;

    /// The shared HMAC fallback secret, if configured.
    fn hmac_secret(&self) -> Option<&[u8]>;
}

#[cfg(test)]
pub struct MockTimeSource(pub std::sync::atomic::AtomicU64);

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> u64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
pub struct MockSigningKeySource {
    pub ecdsa: Option<qc_crypto::KeyPair>,
    pub hmac: Option<Vec<u8>>,
}

#[cfg(test)]
impl SigningKeySource for MockSigningKeySource {
    fn ecdsa_key(&self) -> Option<&qc_crypto::KeyPair> {
        self.ecdsa.as_ref()
    }

    fn hmac_secret(&self) -> Option<&[u8]> {
        self.hmac.as_deref()
    }
}

//! Outbound (driven) ports for the mempool subsystem.

use crate::domain::{Address, MempoolError, Timestamp};

/// Supplies the last confirmed nonce per sender, sourced from chain state.
/// Used to seed/refresh the `NonceInPast` check on `addTransaction`.
pub trait NonceProvider: Send + Sync {
    /// Returns the highest nonce confirmed into the chain for `address`,
    /// or 0 if the account has never transacted.
    fn last_confirmed_nonce(&self, address: &Address) -> Result<u64, MempoolError>;
}

/// Time source for consistent, testable timestamp handling.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in seconds since the UNIX epoch.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
pub struct MockNonceProvider {
    nonces: std::collections::HashMap<Address, u64>,
}

#[cfg(test)]
impl MockNonceProvider {
    pub fn new() -> Self {
        Self {
            nonces: std::collections::HashMap::new(),
        }
    }

    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.nonces.insert(address, nonce);
        self
    }
}

#[cfg(test)]
impl NonceProvider for MockNonceProvider {
    fn last_confirmed_nonce(&self, address: &Address) -> Result<u64, MempoolError> {
        Ok(self.nonces.get(address).copied().unwrap_or(0))
    }
}

#[cfg(test)]
pub struct MockTimeSource {
    time: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: std::sync::atomic::AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_time_source_returns_reasonable_timestamp() {
        let source = SystemTimeSource;
        assert!(source.now() > 1_577_836_800); // Jan 1, 2020
    }

    #[test]
    fn mock_nonce_provider_defaults_to_zero() {
        let provider = MockNonceProvider::new().with_nonce([0xAA; 20], 5);
        assert_eq!(provider.last_confirmed_nonce(&[0xAA; 20]).unwrap(), 5);
        assert_eq!(provider.last_confirmed_nonce(&[0xBB; 20]).unwrap(), 0);
    }

    #[test]
    fn mock_time_source_advances() {
        let source = MockTimeSource::new(1000);
        source.advance(500);
        assert_eq!(source.now(), 1500);
        source.set(3000);
        assert_eq!(source.now(), 3000);
    }
}

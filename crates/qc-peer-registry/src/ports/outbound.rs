//! Outbound (driven) ports for the peer registry.

/// Time source for consistent, testable timestamp handling.
pub trait TimeSource: Send + Sync {
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

#[cfg(test)]
pub struct MockTimeSource(pub std::sync::atomic::AtomicU64);

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> u64 {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }
}

//! Adaptive heartbeat interval: base 30s, adjusted by recent network
//! conditions and clamped to `[15s, 120s]`.

/// Inputs to the adaptive interval formula.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkConditions {
    /// Number of peers currently `Active`.
    pub active_peers: usize,
    /// Average recent response time across peers, in seconds.
    pub avg_response_time_secs: f64,
    /// Failures observed in the recent window.
    pub recent_failures: u32,
}

const BASE_INTERVAL_SECS: f64 = 30.0;
const MIN_INTERVAL_SECS: u64 = 15;
const MAX_INTERVAL_SECS: u64 = 120;

/// Computes the next heartbeat interval: halved when thin on peers,
/// inflated 1.5x when peers are slow to respond, shrunk 0.7x when recent
/// failures are high (heartbeat more often to detect a fading peer sooner).
#[must_use]
pub fn adaptive_interval_secs(conditions: NetworkConditions) -> u64 {
    let mut interval = BASE_INTERVAL_SECS;
    if conditions.active_peers < 3 {
        interval *= 0.5;
    }
    if conditions.avg_response_time_secs > 3.0 {
        interval *= 1.5;
    }
    if conditions.recent_failures > 10 {
        interval *= 0.7;
    }
    (interval.round() as u64).clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_interval_when_healthy() {
        let interval = adaptive_interval_secs(NetworkConditions {
            active_peers: 10,
            avg_response_time_secs: 0.1,
            recent_failures: 0,
        });
        assert_eq!(interval, 30);
    }

    #[test]
    fn thin_peers_halves_interval() {
        let interval = adaptive_interval_secs(NetworkConditions {
            active_peers: 1,
            avg_response_time_secs: 0.1,
            recent_failures: 0,
        });
        assert_eq!(interval, 15);
    }

    #[test]
    fn slow_peers_clamped_to_max() {
        let interval = adaptive_interval_secs(NetworkConditions {
            active_peers: 10,
            avg_response_time_secs: 10.0,
            recent_failures: 0,
        });
        assert_eq!(interval, 45);
    }

    #[test]
    fn clamped_to_floor_and_ceiling() {
        assert!(adaptive_interval_secs(NetworkConditions {
            active_peers: 0,
            avg_response_time_secs: 0.0,
            recent_failures: 0,
        }) >= MIN_INTERVAL_SECS);
    }
}

//! `CircuitBreaker`: a closed/open/half_open state machine per
//! `(peer_id, operation)`, guarding outbound calls to flaky peers.

use shared_types::{CircuitPhase, CircuitState};
use std::collections::HashMap;

/// Tunable breaker thresholds.
#[derive(Debug, Clone, Copy)]
pub struct BreakerConfig {
    /// Consecutive failures that trip `Closed` → `Open`.
    pub failure_threshold: u32,
    /// Consecutive successes in `HalfOpen` needed to close.
    pub success_threshold: u32,
    /// Seconds an `Open` circuit waits before allowing a probe.
    pub timeout_secs: u64,
    /// Minimum sample size before the error-rate trip condition applies.
    pub request_volume_threshold: u64,
    /// Error percentage (0-100) over the sampling window that trips the
    /// circuit once `request_volume_threshold` is met.
    pub error_percentage_threshold: u8,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 3,
            timeout_secs: 60,
            request_volume_threshold: 10,
            error_percentage_threshold: 50,
        }
    }
}

/// A transition worth persisting and emitting as an event row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CircuitPhase,
    pub to: CircuitPhase,
}

/// Registry of circuits, keyed by `(peer_id, operation)`.
pub struct CircuitBreakerRegistry {
    config: BreakerConfig,
    circuits: HashMap<(String, String), CircuitState>,
}

impl CircuitBreakerRegistry {
    #[must_use]
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            circuits: HashMap::new(),
        }
    }

    fn entry(&mut self, peer_id: &str, operation: &str, now: u64) -> &mut CircuitState {
        self.circuits
            .entry((peer_id.to_string(), operation.to_string()))
            .or_insert_with(|| CircuitState {
                peer_id: peer_id.to_string(),
                operation: operation.to_string(),
                state: CircuitPhase::Closed,
                failure_count: 0,
                success_count: 0,
                last_failure_at: None,
                last_success_at: None,
                state_changed_at: now,
                next_attempt_at: 0,
                total_requests: 0,
                failed_requests: 0,
            })
    }

    /// Whether a request may proceed right now. `Open` circuits transition
    /// to `HalfOpen` once `timeout_secs` has elapsed, allowing exactly one
    /// probe through.
    pub fn allow_request(&mut self, peer_id: &str, operation: &str, now: u64) -> bool {
        let circuit = self.entry(peer_id, operation, now);
        match circuit.state {
            CircuitPhase::Closed | CircuitPhase::HalfOpen => true,
            CircuitPhase::Open => {
                if now >= circuit.next_attempt_at {
                    circuit.state = CircuitPhase::HalfOpen;
                    circuit.state_changed_at = now;
                    circuit.success_count = 0;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Snapshot of a circuit's current state, if it has ever been touched.
    #[must_use]
    pub fn get(&self, peer_id: &str, operation: &str) -> Option<&CircuitState> {
        self.circuits.get(&(peer_id.to_string(), operation.to_string()))
    }

    /// Records a successful call, possibly closing a `HalfOpen` circuit.
    pub fn record_success(&mut self, peer_id: &str, operation: &str, now: u64) -> Option<Transition> {
        let threshold = self.config.success_threshold;
        let circuit = self.entry(peer_id, operation, now);
        circuit.total_requests += 1;
        circuit.last_success_at = Some(now);
        circuit.failure_count = 0;

        match circuit.state {
            CircuitPhase::Closed => None,
            CircuitPhase::HalfOpen => {
                circuit.success_count += 1;
                if circuit.success_count >= threshold {
                    let from = circuit.state;
                    circuit.state = CircuitPhase::Closed;
                    circuit.state_changed_at = now;
                    circuit.success_count = 0;
                    circuit.total_requests = 0;
                    circuit.failed_requests = 0;
                    Some(Transition {
                        from,
                        to: CircuitPhase::Closed,
                    })
                } else {
                    None
                }
            }
            CircuitPhase::Open => None,
        }
    }

    /// Records a failed call, tripping `Closed` → `Open` on consecutive
    /// failures or a sustained error rate, and any `HalfOpen` → `Open`.
    pub fn record_failure(&mut self, peer_id: &str, operation: &str, now: u64) -> Option<Transition> {
        let config = self.config;
        let circuit = self.entry(peer_id, operation, now);
        circuit.total_requests += 1;
        circuit.failed_requests += 1;
        circuit.failure_count += 1;
        circuit.last_failure_at = Some(now);

        match circuit.state {
            CircuitPhase::HalfOpen => {
                let from = circuit.state;
                circuit.state = CircuitPhase::Open;
                circuit.state_changed_at = now;
                circuit.next_attempt_at = now + config.timeout_secs;
                circuit.success_count = 0;
                Some(Transition {
                    from,
                    to: CircuitPhase::Open,
                })
            }
            CircuitPhase::Closed => {
                let error_rate_tripped = circuit.total_requests >= config.request_volume_threshold
                    && (circuit.failed_requests * 100 / circuit.total_requests)
                        >= u64::from(config.error_percentage_threshold);
                if circuit.failure_count >= config.failure_threshold || error_rate_tripped {
                    let from = circuit.state;
                    circuit.state = CircuitPhase::Open;
                    circuit.state_changed_at = now;
                    circuit.next_attempt_at = now + config.timeout_secs;
                    Some(Transition {
                        from,
                        to: CircuitPhase::Open,
                    })
                } else {
                    None
                }
            }
            CircuitPhase::Open => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CircuitBreakerRegistry {
        CircuitBreakerRegistry::new(BreakerConfig::default())
    }

    #[test]
    fn trips_open_after_consecutive_failures() {
        let mut r = registry();
        for t in 0..4 {
            assert!(r.record_failure("p1", "broadcast", t).is_none());
        }
        let transition = r.record_failure("p1", "broadcast", 4).unwrap();
        assert_eq!(transition.to, CircuitPhase::Open);
        assert!(!r.allow_request("p1", "broadcast", 5));
    }

    #[test]
    fn half_opens_after_timeout_and_closes_after_successes() {
        let mut r = registry();
        for t in 0..5 {
            r.record_failure("p1", "broadcast", t);
        }
        assert!(r.allow_request("p1", "broadcast", 65));
        assert_eq!(r.get("p1", "broadcast").unwrap().state, CircuitPhase::HalfOpen);

        r.record_success("p1", "broadcast", 66);
        r.record_success("p1", "broadcast", 67);
        let transition = r.record_success("p1", "broadcast", 68).unwrap();
        assert_eq!(transition.to, CircuitPhase::Closed);
    }

    #[test]
    fn any_half_open_failure_reopens() {
        let mut r = registry();
        for t in 0..5 {
            r.record_failure("p1", "broadcast", t);
        }
        r.allow_request("p1", "broadcast", 65);
        let transition = r.record_failure("p1", "broadcast", 66).unwrap();
        assert_eq!(transition.to, CircuitPhase::Open);
    }

    #[test]
    fn error_rate_trip_needs_minimum_volume() {
        let mut r = registry();
        // Three requests, all failures, but below request_volume_threshold.
        r.record_failure("p1", "x", 0);
        r.record_failure("p1", "x", 1);
        assert!(r.get("p1", "x").unwrap().state == CircuitPhase::Closed);
    }

    #[test]
    fn independent_circuits_per_peer_and_operation() {
        let mut r = registry();
        for t in 0..5 {
            r.record_failure("p1", "broadcast", t);
        }
        assert!(r.allow_request("p1", "sync", 1));
        assert_eq!(r.get("p1", "sync").unwrap().state, CircuitPhase::Closed);
    }
}

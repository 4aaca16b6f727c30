//! Event publisher adapter for the resilience subsystem.

use shared_types::{CircuitPhase, SyncManualTriggerPayload};

/// Topics published by resilience.
pub mod topics {
    /// Every circuit breaker phase transition.
    pub const CIRCUIT_TRANSITION: &str = "resilience.circuit_transition";
    /// A sync reconciliation has been triggered.
    pub const SYNC_MANUAL_TRIGGER: &str = "sync.manual_trigger";
}

/// Error type for publish operations.
#[derive(Debug, Clone)]
pub enum PublishError {
    NotConnected,
    Internal(String),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "event bus not connected"),
            Self::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for PublishError {}

/// Event publisher trait for resilience.
pub trait ResilienceEventPublisher: Send + Sync {
    /// Publishes a circuit breaker phase transition.
    fn publish_circuit_transition(
        &self,
        peer_id: &str,
        operation: &str,
        from: CircuitPhase,
        to: CircuitPhase,
    ) -> Result<(), PublishError>;

    /// Publishes a `sync.manual_trigger`, PRIORITY_HIGH per the event
    /// priority convention (`1`).
    fn publish_sync_manual_trigger(&self, trigger: SyncManualTriggerPayload) -> Result<(), PublishError>;
}

/// No-op publisher for use without a connected event bus.
#[derive(Debug, Clone, Default)]
pub struct NoOpPublisher;

impl ResilienceEventPublisher for NoOpPublisher {
    fn publish_circuit_transition(
        &self,
        _peer_id: &str,
        _operation: &str,
        _from: CircuitPhase,
        _to: CircuitPhase,
    ) -> Result<(), PublishError> {
        Ok(())
    }

    fn publish_sync_manual_trigger(&self, _trigger: SyncManualTriggerPayload) -> Result<(), PublishError> {
        Ok(())
    }
}

#[cfg(test)]
pub struct RecordingPublisher {
    pub transitions: std::sync::Mutex<Vec<(String, String, CircuitPhase, CircuitPhase)>>,
    pub triggers: std::sync::Mutex<Vec<SyncManualTriggerPayload>>,
}

#[cfg(test)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            transitions: std::sync::Mutex::new(Vec::new()),
            triggers: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl ResilienceEventPublisher for RecordingPublisher {
    fn publish_circuit_transition(
        &self,
        peer_id: &str,
        operation: &str,
        from: CircuitPhase,
        to: CircuitPhase,
    ) -> Result<(), PublishError> {
        self.transitions
            .lock()
            .unwrap()
            .push((peer_id.to_string(), operation.to_string(), from, to));
        Ok(())
    }

    fn publish_sync_manual_trigger(&self, trigger: SyncManualTriggerPayload) -> Result<(), PublishError> {
        self.triggers.lock().unwrap().push(trigger);
        Ok(())
    }
}

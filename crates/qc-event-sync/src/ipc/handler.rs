//! Wire translation for `POST /api/sync/events`.

use crate::domain::{Event, EventSyncError, EventType};
use crate::ports::inbound::{EventSyncApi, ReceiveOutcome};

/// The decoded request body plus its framing headers
/// (`X-Event-Priority`/`X-Source-Node`/`X-Event-Type` are carried on
/// `event_type`/`priority`/`source_node_id` here; the caller is expected
/// to have already parsed the JSON body into this shape).
pub struct IncomingEventRequest {
    pub id: String,
    pub event_type: String,
    pub priority: u8,
    pub payload: Vec<u8>,
    pub source_node_id: String,
    pub hop_count: u8,
    pub path: Vec<String>,
}

/// Maps 1:1 onto the wire contract's status codes: 200 accept, 202
/// dedupe-skip, 429 queue-full, 401 HMAC fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestResponse {
    Accepted,
    DedupeSkipped,
    QueueFull,
    AuthFailed,
    UnknownEventType,
}

#[must_use]
pub fn parse_event_type(s: &str) -> Option<EventType> {
    match s {
        "block.created" => Some(EventType::BlockCreated),
        "tx.received" => Some(EventType::TxReceived),
        "node.registered" => Some(EventType::NodeRegistered),
        "heartbeat" => Some(EventType::Heartbeat),
        "sync.request" => Some(EventType::SyncRequest),
        "sync.response" => Some(EventType::SyncResponse),
        "sync.manual_trigger" => Some(EventType::SyncManualTrigger),
        _ => None,
    }
}

pub fn handle_incoming_event(api: &mut dyn EventSyncApi, request: IncomingEventRequest, body: &[u8], signature_hex: &str) -> IngestResponse {
    let Some(event_type) = parse_event_type(&request.event_type) else {
        return IngestResponse::UnknownEventType;
    };
    let mut event = Event::originate(request.id, event_type, request.payload, request.source_node_id, 0);
    event.priority = request.priority;
    event.hop_count = request.hop_count;
    event.path = request.path;

    match api.receive(event, body, signature_hex) {
        Ok((_, ReceiveOutcome::Accepted)) => IngestResponse::Accepted,
        Ok((_, ReceiveOutcome::DedupeSkipped)) => IngestResponse::DedupeSkipped,
        Err(EventSyncError::AuthError) => IngestResponse::AuthFailed,
        Err(EventSyncError::QueueOverflow) => IngestResponse::QueueFull,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::security::sign_body;
    use crate::ports::outbound::{AllowAllGate, FixedPeers, MockTimeSource};
    use crate::service::EventSyncService;
    use std::sync::atomic::AtomicU64;

    fn request(sig_secret: &[u8], body: &[u8]) -> (IncomingEventRequest, String) {
        let req = IncomingEventRequest {
            id: "e1".to_string(),
            event_type: "tx.received".to_string(),
            priority: 3,
            payload: vec![1, 2, 3],
            source_node_id: "remote".to_string(),
            hop_count: 0,
            path: vec![],
        };
        (req, sign_body(sig_secret, body))
    }

    #[test]
    fn accepts_validly_signed_event() {
        let mut svc = EventSyncService::new(
            "local",
            b"secret".to_vec(),
            10,
            MockTimeSource(AtomicU64::new(0)),
            AllowAllGate,
            FixedPeers(vec![]),
        );
        let (req, sig) = request(b"secret", b"body");
        let resp = handle_incoming_event(&mut svc, req, b"body", &sig);
        assert_eq!(resp, IngestResponse::Accepted);
    }

    #[test]
    fn rejects_bad_signature_with_401_equivalent() {
        let mut svc = EventSyncService::new(
            "local",
            b"secret".to_vec(),
            10,
            MockTimeSource(AtomicU64::new(0)),
            AllowAllGate,
            FixedPeers(vec![]),
        );
        let (req, _) = request(b"secret", b"body");
        let resp = handle_incoming_event(&mut svc, req, b"body", "00");
        assert_eq!(resp, IngestResponse::AuthFailed);
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let mut svc = EventSyncService::new(
            "local",
            b"secret".to_vec(),
            10,
            MockTimeSource(AtomicU64::new(0)),
            AllowAllGate,
            FixedPeers(vec![]),
        );
        let mut req = request(b"secret", b"body").0;
        req.event_type = "bogus".to_string();
        let resp = handle_incoming_event(&mut svc, req, b"body", "00");
        assert_eq!(resp, IngestResponse::UnknownEventType);
    }
}

//! Per-peer broadcast decisioning: circuit state, anti-loop path check,
//! and the hop ceiling.

use super::event::{Event, DEFAULT_MAX_HOPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastDecision {
    Send,
    SkipCircuitOpen,
    SkipAlreadyVisited,
    SkipMaxHops,
}

#[must_use]
pub fn decide_broadcast(event: &Event, peer_id: &str, circuit_allows: bool, max_hops: u8) -> BroadcastDecision {
    if !circuit_allows {
        return BroadcastDecision::SkipCircuitOpen;
    }
    if event.has_visited(peer_id) {
        return BroadcastDecision::SkipAlreadyVisited;
    }
    if event.hop_count >= max_hops {
        return BroadcastDecision::SkipMaxHops;
    }
    BroadcastDecision::Send
}

#[must_use]
pub fn decide_broadcast_default_hops(event: &Event, peer_id: &str, circuit_allows: bool) -> BroadcastDecision {
    decide_broadcast(event, peer_id, circuit_allows, DEFAULT_MAX_HOPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event::originate("e1", super::super::event::EventType::TxReceived, vec![], "n1", 0)
    }

    #[test]
    fn skips_when_circuit_open() {
        assert_eq!(decide_broadcast_default_hops(&event(), "p1", false), BroadcastDecision::SkipCircuitOpen);
    }

    #[test]
    fn skips_peer_already_in_path() {
        let mut e = event();
        e.path.push("p1".to_string());
        assert_eq!(decide_broadcast_default_hops(&e, "p1", true), BroadcastDecision::SkipAlreadyVisited);
    }

    #[test]
    fn skips_at_max_hops() {
        let mut e = event();
        e.hop_count = DEFAULT_MAX_HOPS;
        assert_eq!(decide_broadcast_default_hops(&e, "p1", true), BroadcastDecision::SkipMaxHops);
    }

    #[test]
    fn sends_otherwise() {
        assert_eq!(decide_broadcast_default_hops(&event(), "p1", true), BroadcastDecision::Send);
    }
}

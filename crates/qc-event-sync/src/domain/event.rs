//! The wire event model: type, priority, opaque payload, anti-loop trail.

/// Lower values dispatch and broadcast first.
pub const PRIORITY_HIGHEST: u8 = 1;
pub const PRIORITY_HIGH: u8 = 1;
pub const PRIORITY_NORMAL: u8 = 3;
pub const PRIORITY_LOWEST: u8 = 5;

/// Default anti-loop hop ceiling.
pub const DEFAULT_MAX_HOPS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    BlockCreated,
    TxReceived,
    NodeRegistered,
    Heartbeat,
    SyncRequest,
    SyncResponse,
    SyncManualTrigger,
}

impl EventType {
    /// Default priority per event type: block creation and a manual sync
    /// trigger broadcast ahead of routine heartbeat/tx chatter.
    #[must_use]
    pub fn default_priority(self) -> u8 {
        match self {
            Self::BlockCreated | Self::SyncManualTrigger => PRIORITY_HIGH,
            Self::SyncRequest | Self::SyncResponse => 2,
            Self::TxReceived | Self::NodeRegistered => PRIORITY_NORMAL,
            Self::Heartbeat => PRIORITY_LOWEST,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockCreated => "block.created",
            Self::TxReceived => "tx.received",
            Self::NodeRegistered => "node.registered",
            Self::Heartbeat => "heartbeat",
            Self::SyncRequest => "sync.request",
            Self::SyncResponse => "sync.response",
            Self::SyncManualTrigger => "sync.manual_trigger",
        }
    }
}

/// An event flowing through the local queue and the inter-node broadcaster.
/// `payload` is the opaque, already-serialized body; this layer only routes,
/// dedupes, and tracks it.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: String,
    pub event_type: EventType,
    pub priority: u8,
    pub payload: Vec<u8>,
    pub source_node_id: String,
    pub hop_count: u8,
    pub path: Vec<String>,
    pub created_at: u64,
}

impl Event {
    #[must_use]
    pub fn originate(
        id: impl Into<String>,
        event_type: EventType,
        payload: Vec<u8>,
        source_node_id: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: id.into(),
            priority: event_type.default_priority(),
            payload,
            source_node_id: source_node_id.into(),
            event_type,
            hop_count: 0,
            path: Vec::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn has_visited(&self, node_id: &str) -> bool {
        self.path.iter().any(|p| p == node_id)
    }

    /// Appends `node_id` to the trail and bumps the hop count, as done by a
    /// receiver before dispatching locally and re-broadcasting.
    pub fn record_hop(&mut self, node_id: impl Into<String>) {
        self.path.push(node_id.into());
        self.hop_count = self.hop_count.saturating_add(1);
    }
}

// Copyright 2026 Murk Contributors
// SPDX-License-Identifier: Apache-2.0

//! Engine event bus: typed notifications for embedding consumers.
//!
//! A `tokio::sync::broadcast` channel carrying [`EngineEvent`] values. Any
//! consumer (a results panel, a log sink, tests) can subscribe
//! independently; when no subscribers exist, events are silently dropped.
//! `SnapshotReplaced` is the refresh hook an out-of-scope results panel
//! would listen for.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Every event the engine emits. Serialized to JSON for external streaming.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// A scan cycle began.
    ScanStarted { location: String },
    /// A scan cycle finished.
    ScanComplete {
        produced: usize,
        total: usize,
        elapsed_ms: u64,
    },
    /// The current snapshot was replaced; consumers should refresh.
    SnapshotReplaced { findings: usize },
    /// The lifetime findings cap was reached; scanning is permanently off.
    CapReached { total: usize },
}

/// The engine's broadcast bus.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EngineEvent>,
}

impl EventBus {
    /// Create a new bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers. Silently ignores if none exist.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to receive all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = EngineEvent::ScanComplete {
            produced: 3,
            total: 7,
            elapsed_ms: 12,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ScanComplete"));
        let parsed: EngineEvent = serde_json::from_str(&json).unwrap();
        match parsed {
            EngineEvent::ScanComplete { produced, total, .. } => {
                assert_eq!(produced, 3);
                assert_eq!(total, 7);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(8);
        bus.emit(EngineEvent::CapReached { total: 128 });
    }

    #[test]
    fn test_subscribe_receives() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        bus.emit(EngineEvent::SnapshotReplaced { findings: 2 });
        match rx.try_recv().unwrap() {
            EngineEvent::SnapshotReplaced { findings } => assert_eq!(findings, 2),
            _ => panic!("wrong event"),
        }
    }
}

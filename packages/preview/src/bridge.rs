//! Host side of the console bridge.
//!
//! Raw messages arrive from the sandbox in whatever order it posted them.
//! Console relays are turned into [`ConsoleMessage`]s, kept in a bounded
//! history, and fanned out to subscribers in arrival order. Everything else
//! is ignored.

use chrono::{DateTime, Utc};
use codenano_common::{BridgeMessage, ConsoleKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Entries kept before the oldest are dropped
pub const DEFAULT_HISTORY: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleMessage {
    pub kind: ConsoleKind,
    pub content: String,
    /// Arrival order, unique for the lifetime of the bridge
    pub sequence: u64,
    pub received_at: DateTime<Utc>,
}

pub type ConsoleHandler = Box<dyn FnMut(&ConsoleMessage) + Send>;

pub struct ConsoleBridge {
    handlers: Vec<ConsoleHandler>,
    history: VecDeque<ConsoleMessage>,
    capacity: usize,
    next_sequence: u64,
}

impl Default for ConsoleBridge {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY)
    }
}

impl fmt::Debug for ConsoleBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleBridge")
            .field("handlers", &self.handlers.len())
            .field("history", &self.history.len())
            .field("capacity", &self.capacity)
            .field("next_sequence", &self.next_sequence)
            .finish()
    }
}

impl ConsoleBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handlers: Vec::new(),
            history: VecDeque::new(),
            capacity: capacity.max(1),
            next_sequence: 1,
        }
    }

    /// Subscribe to every console message received from now on
    pub fn on_message<F>(&mut self, handler: F)
    where
        F: FnMut(&ConsoleMessage) + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Feed a raw message posted by the sandbox
    pub fn receive(&mut self, raw: &str) -> Option<ConsoleMessage> {
        match BridgeMessage::parse(raw) {
            Some(message) => self.push(message),
            None => {
                tracing::trace!("Ignoring non-console message");
                None
            }
        }
    }

    /// Feed an already-decoded message
    pub fn receive_value(&mut self, value: serde_json::Value) -> Option<ConsoleMessage> {
        BridgeMessage::from_value(value).and_then(|message| self.push(message))
    }

    pub fn push(&mut self, message: BridgeMessage) -> Option<ConsoleMessage> {
        let kind = message.kind()?;
        Some(self.record(kind, message.content))
    }

    /// Record a message that did not come over the wire
    pub fn record(&mut self, kind: ConsoleKind, content: String) -> ConsoleMessage {
        let entry = ConsoleMessage {
            kind,
            content,
            sequence: self.next_sequence,
            received_at: Utc::now(),
        };
        self.next_sequence += 1;

        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(entry.clone());

        for handler in self.handlers.iter_mut() {
            handler(&entry);
        }

        entry
    }

    pub fn history(&self) -> impl Iterator<Item = &ConsoleMessage> {
        self.history.iter()
    }

    /// History entries with a sequence greater than `after`
    pub fn since(&self, after: u64) -> Vec<ConsoleMessage> {
        self.history
            .iter()
            .filter(|entry| entry.sequence > after)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forget the history. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn drain(&mut self) -> Vec<ConsoleMessage> {
        self.history.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_receive_console_message() {
        let mut bridge = ConsoleBridge::new();
        let message = bridge
            .receive(r#"{"type":"console-error","content":"boom"}"#)
            .unwrap();

        assert_eq!(message.kind, ConsoleKind::Error);
        assert_eq!(message.content, "boom");
        assert_eq!(message.sequence, 1);
        assert_eq!(bridge.len(), 1);
    }

    #[test]
    fn test_ignores_unrelated_messages() {
        let mut bridge = ConsoleBridge::new();
        assert!(bridge.receive(r#"{"type":"loaded","generation":3}"#).is_none());
        assert!(bridge.receive("garbage").is_none());
        assert!(bridge
            .receive_value(serde_json::json!({ "type": "console-trace", "content": "x" }))
            .is_none());
        assert!(bridge.is_empty());
    }

    #[test]
    fn test_handlers_see_arrival_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let mut bridge = ConsoleBridge::new();
        bridge.on_message(move |message| {
            sink.lock().unwrap().push(message.content.clone());
        });

        bridge.receive(r#"{"type":"console-log","content":"first"}"#);
        bridge.receive(r#"{"type":"console-warn","content":"second"}"#);
        bridge.receive(r#"{"type":"console-info","content":"third"}"#);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut bridge = ConsoleBridge::with_capacity(3);
        for i in 0..5 {
            bridge.record(ConsoleKind::Log, i.to_string());
        }

        let contents: Vec<_> = bridge.history().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_clear_keeps_sequence_counting() {
        let mut bridge = ConsoleBridge::new();
        bridge.record(ConsoleKind::Log, "a".to_string());
        bridge.clear();
        let next = bridge.record(ConsoleKind::Log, "b".to_string());

        assert_eq!(next.sequence, 2);
        assert_eq!(bridge.since(1).len(), 1);
        assert_eq!(bridge.drain().len(), 1);
        assert!(bridge.is_empty());
    }
}

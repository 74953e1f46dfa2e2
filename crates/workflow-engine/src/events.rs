//! Execution events and the sinks that carry them
//!
//! The scheduler emits one event stream per pass: a `running` event
//! before each attempted node and exactly one terminal event
//! (`completed` or `error`) per attempted node. Events are pushed into
//! an [`EventSink`], which abstracts over the transport (collecting
//! vector, tokio channel, UI bridge) so the engine stays independent of
//! any frontend.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::node::PortValue;
use crate::types::NodeId;

/// Status of one node attempt within a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// The node is about to execute
    Running,
    /// The node produced (or had synthesized) its outputs
    Completed,
    /// The node failed, or a structural error aborted the pass
    Error,
}

/// One event for one node in one pass
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionEvent {
    /// The node this event concerns
    pub node_id: NodeId,
    /// What happened
    pub status: ExecutionStatus,
    /// Pass progress, 0-100
    pub progress: f32,
    /// Output values, present on completed events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<HashMap<String, PortValue>>,
    /// Error message, present on error events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionEvent {
    /// Create a running event
    pub fn running(node_id: impl Into<String>, progress: f32) -> Self {
        Self {
            node_id: node_id.into(),
            status: ExecutionStatus::Running,
            progress,
            result: None,
            error: None,
        }
    }

    /// Create a completed event carrying the node's outputs
    pub fn completed(
        node_id: impl Into<String>,
        progress: f32,
        result: HashMap<String, PortValue>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            status: ExecutionStatus::Completed,
            progress,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error event
    pub fn error(node_id: impl Into<String>, progress: f32, error: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            status: ExecutionStatus::Error,
            progress,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Trait for delivering execution events to a consumer
///
/// This abstracts over the transport mechanism (mpsc channel, collected
/// vector, UI bridge) allowing the engine to be used in different
/// contexts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., the
    /// consumer went away).
    fn send(&self, event: ExecutionEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: ExecutionEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify the emitted sequence.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<ExecutionEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<ExecutionEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: ExecutionEvent) -> Result<(), EventError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// An event sink backed by a tokio mpsc channel
///
/// The receiver side gives callers the pass as a lazy event sequence;
/// dropping the receiver makes subsequent sends fail, which the engine
/// surfaces as an event-delivery error.
pub struct ChannelEventSink {
    sender: tokio::sync::mpsc::UnboundedSender<ExecutionEvent>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver that consumes its events
    pub fn unbounded() -> (Self, tokio::sync::mpsc::UnboundedReceiver<ExecutionEvent>) {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: ExecutionEvent) -> Result<(), EventError> {
        self.sender
            .send(event)
            .map_err(|_| EventError::channel_closed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink_collects() {
        let sink = VecEventSink::new();

        sink.send(ExecutionEvent::running("node1", 0.0)).unwrap();
        sink.send(ExecutionEvent::completed("node1", 50.0, HashMap::new()))
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].status, ExecutionStatus::Running);
        assert_eq!(events[1].status, ExecutionStatus::Completed);
        assert_eq!(events[1].progress, 50.0);
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        sink.send(ExecutionEvent::error("node1", 0.0, "boom"))
            .unwrap();
    }

    #[tokio::test]
    async fn test_channel_event_sink_delivers() {
        let (sink, mut receiver) = ChannelEventSink::unbounded();

        sink.send(ExecutionEvent::running("node1", 0.0)).unwrap();

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.node_id, "node1");
        assert_eq!(event.status, ExecutionStatus::Running);
    }

    #[tokio::test]
    async fn test_channel_event_sink_closed_receiver() {
        let (sink, receiver) = ChannelEventSink::unbounded();
        drop(receiver);

        assert!(sink.send(ExecutionEvent::running("node1", 0.0)).is_err());
    }

    #[test]
    fn test_event_serialization() {
        let event = ExecutionEvent::error("node1", 25.0, "missing input");
        let json = serde_json::to_string(&event).unwrap();

        assert!(json.contains("\"nodeId\":\"node1\""));
        assert!(json.contains("\"status\":\"error\""));
        assert!(json.contains("missing input"));
        // Absent result is omitted entirely
        assert!(!json.contains("result"));
    }
}

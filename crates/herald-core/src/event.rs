//! Event record for the Herald dispatch core.
//!
//! An [`Event`] is a typed message: a `type` discriminator naming the kind
//! of event, plus an open payload of arbitrary JSON fields the core never
//! interprets. Events are decoded from queue deliveries by the external
//! consumer and handed to [`Dispatcher::dispatch`] one at a time.
//!
//! The `type` field is optional at the record level because the wire
//! format does not guarantee it: what happens to an event without a type
//! is a dispatch policy decision, not a decode error. See
//! [`DispatchPolicy::error_on_missing_type`].
//!
//! # Isolation
//!
//! Handlers receive the event behind `Arc<Event>` with no interior
//! mutability: nothing a handler does can change the event observed by
//! the handlers after it in the same dispatch.
//!
//! # Example
//!
//! ```rust,ignore
//! use herald_core::Event;
//!
//! // Decoded from a queue delivery:
//! let event = Event::from_slice(br#"{"type": "order.created", "id": 42}"#)?;
//! assert_eq!(event.event_type(), Some("order.created"));
//!
//! // Built in-process (tests, local producers):
//! let event = Event::new("order.created").with("id", 42);
//! ```
//!
//! [`Dispatcher::dispatch`]: crate::dispatcher::Dispatcher::dispatch
//! [`DispatchPolicy::error_on_missing_type`]: crate::dispatcher::DispatchPolicy

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed message with an open payload.
///
/// Immutable once constructed; the dispatcher reads it for the duration
/// of one dispatch call and it has no further existence afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The event type discriminator, e.g. `"order.created"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,

    /// Every other field of the message, untyped from the core's view.
    #[serde(flatten)]
    payload: Map<String, Value>,
}

impl Event {
    /// Creates a typed event with an empty payload.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            kind: Some(event_type.into()),
            payload: Map::new(),
        }
    }

    /// Creates an event without a type discriminator.
    ///
    /// Such events are rejected or dropped at dispatch time depending on
    /// [`DispatchPolicy::error_on_missing_type`]; the constructor exists
    /// because the wire format does not guarantee the field.
    ///
    /// [`DispatchPolicy::error_on_missing_type`]: crate::dispatcher::DispatchPolicy
    pub fn untyped() -> Self {
        Self {
            kind: None,
            payload: Map::new(),
        }
    }

    /// Adds a payload field (builder style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Decodes an event from a JSON value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Decodes an event from raw JSON bytes, as delivered by the queue.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Returns the event type, or `None` when the message carried no
    /// `type` field.
    pub fn event_type(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Returns a payload field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Returns the full payload map.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

/// Renders the event as compact JSON, used when logging contained
/// failures with the raw payload for context.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str("<unrenderable event>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_type_and_arbitrary_payload_fields() {
        let event =
            Event::from_slice(br#"{"type": "order.created", "id": 42, "tags": ["a"]}"#).unwrap();

        assert_eq!(event.event_type(), Some("order.created"));
        assert_eq!(event.get("id"), Some(&json!(42)));
        assert_eq!(event.get("tags"), Some(&json!(["a"])));
        // The discriminator is not part of the payload map.
        assert_eq!(event.payload().len(), 2);
    }

    #[test]
    fn missing_type_field_decodes_as_untyped() {
        let event = Event::from_value(json!({"payload": "not a valid event"})).unwrap();

        assert_eq!(event.event_type(), None);
        assert_eq!(event.get("payload"), Some(&json!("not a valid event")));
    }

    #[test]
    fn builder_matches_decoded_form() {
        let built = Event::new("order.created").with("id", 42);
        let decoded = Event::from_value(json!({"type": "order.created", "id": 42})).unwrap();

        assert_eq!(built, decoded);
    }

    #[test]
    fn display_renders_compact_json_including_type() {
        let event = Event::new("order.created").with("id", 42);
        let rendered: Value = serde_json::from_str(&event.to_string()).unwrap();

        assert_eq!(rendered, json!({"type": "order.created", "id": 42}));
    }
}

//! Message frames exchanged with the browser.
//!
//! CDP frames are JSON objects. Commands carry an `id`, responses echo it back,
//! and events carry a `method` without an `id`. When the connection is in
//! flat-session mode every frame addressed to a page also carries `sessionId`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command sent to the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
	/// Unique request ID for correlating responses
	pub id: u64,
	/// Domain-qualified method name, e.g. `Runtime.evaluate`
	pub method: String,
	/// Method parameters as JSON object
	#[serde(default, skip_serializing_if = "Value::is_null")]
	pub params: Value,
	/// Target session the command is routed to (absent for browser-level commands)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Reply to a [`Request`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
	/// Request ID this response correlates to
	pub id: u64,
	/// Success result (mutually exclusive with error)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<Value>,
	/// Error result (mutually exclusive with result)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<ProtocolError>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Error object attached to a failed [`Response`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolError {
	/// JSON-RPC style error code (e.g. `-32000` for generic server errors)
	pub code: i64,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<String>,
}

/// Unsolicited notification from the browser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
	/// Domain-qualified event name, e.g. `Page.domContentEventFired`
	pub method: String,
	#[serde(default)]
	pub params: Value,
	/// Session that emitted the event (absent for browser-level events)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
}

/// Discriminated union of incoming frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
	/// Response message (has `id` field)
	Response(Response),
	/// Event message (no `id` field)
	Event(Event),
	/// Anything else (forward-compatible catch-all)
	Unknown(Value),
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn request_omits_empty_fields() {
		let request = Request {
			id: 7,
			method: "Browser.close".into(),
			params: Value::Null,
			session_id: None,
		};
		let value = serde_json::to_value(&request).unwrap();
		assert_eq!(value, json!({ "id": 7, "method": "Browser.close" }));
	}

	#[test]
	fn request_carries_session_id_in_camel_case() {
		let request = Request {
			id: 1,
			method: "Page.enable".into(),
			params: json!({}),
			session_id: Some("S1".into()),
		};
		let value = serde_json::to_value(&request).unwrap();
		assert_eq!(value["sessionId"], "S1");
	}

	#[test]
	fn response_frame_is_parsed_as_response() {
		let frame = json!({ "id": 3, "result": { "frameId": "F" }, "sessionId": "S" });
		match serde_json::from_value::<Message>(frame).unwrap() {
			Message::Response(resp) => {
				assert_eq!(resp.id, 3);
				assert_eq!(resp.session_id.as_deref(), Some("S"));
				assert!(resp.error.is_none());
			}
			other => panic!("expected response, got {other:?}"),
		}
	}

	#[test]
	fn error_frame_keeps_code_and_message() {
		let frame = json!({ "id": 4, "error": { "code": -32000, "message": "Cannot navigate" } });
		let Message::Response(resp) = serde_json::from_value::<Message>(frame).unwrap() else {
			panic!("expected response");
		};
		let err = resp.error.unwrap();
		assert_eq!(err.code, -32000);
		assert_eq!(err.message, "Cannot navigate");
	}

	#[test]
	fn event_frame_is_parsed_as_event() {
		let frame = json!({ "method": "Page.domContentEventFired", "params": { "timestamp": 1.5 }, "sessionId": "S" });
		match serde_json::from_value::<Message>(frame).unwrap() {
			Message::Event(event) => {
				assert_eq!(event.method, "Page.domContentEventFired");
				assert_eq!(event.session_id.as_deref(), Some("S"));
			}
			other => panic!("expected event, got {other:?}"),
		}
	}

	#[test]
	fn unrecognised_frame_falls_through_to_unknown() {
		let frame = json!(["not", "an", "object"]);
		assert!(matches!(serde_json::from_value::<Message>(frame).unwrap(), Message::Unknown(_)));
	}
}

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::*;
use crate::transport::{TransportFuture, TransportReceiver, TransportSender};

/// Forwards outbound frames to the test.
struct ChannelSender(mpsc::UnboundedSender<Value>);

impl TransportSender for ChannelSender {
	fn send(&mut self, message: Value) -> TransportFuture<'_> {
		let sent = self.0.send(message).map_err(|_| Error::ChannelClosed);
		Box::pin(async move { sent })
	}

	fn close(&mut self) -> TransportFuture<'_> {
		Box::pin(async { Ok(()) })
	}
}

/// The test feeds inbound frames directly, so the reader has nothing to do.
struct IdleReceiver;

impl TransportReceiver for IdleReceiver {
	fn run(self: Box<Self>) -> TransportFuture<'static> {
		Box::pin(async { Ok(()) })
	}
}

struct Harness {
	connection: Arc<Connection>,
	outbound: mpsc::UnboundedReceiver<Value>,
	inbound: mpsc::UnboundedSender<Value>,
}

fn create_test_connection() -> Harness {
	let (out_tx, outbound) = mpsc::unbounded_channel();
	let (inbound, message_rx) = mpsc::unbounded_channel();

	let connection = Arc::new(Connection::new(TransportParts {
		sender: Box::new(ChannelSender(out_tx)),
		receiver: Box::new(IdleReceiver),
		message_rx,
	}));

	let runner = Arc::clone(&connection);
	tokio::spawn(async move { runner.run().await });

	Harness {
		connection,
		outbound,
		inbound,
	}
}

#[tokio::test]
async fn test_request_ids_increment() {
	let mut h = create_test_connection();

	for _ in 0..3 {
		let conn = Arc::clone(&h.connection);
		tokio::spawn(async move { conn.send("Page.enable", json!({}), None).await });
	}

	let mut ids = Vec::new();
	for _ in 0..3 {
		ids.push(h.outbound.recv().await.unwrap()["id"].as_u64().unwrap());
	}
	ids.sort();
	assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_response_is_correlated_by_id() {
	let mut h = create_test_connection();

	let conn = Arc::clone(&h.connection);
	let call = tokio::spawn(async move {
		conn.send("Page.navigate", json!({ "url": "http://localhost" }), Some("S1"))
			.await
	});

	let request = h.outbound.recv().await.unwrap();
	assert_eq!(request["method"], "Page.navigate");
	assert_eq!(request["sessionId"], "S1");
	assert_eq!(request["params"]["url"], "http://localhost");

	h.inbound
		.send(json!({ "id": request["id"], "result": { "frameId": "F1" }, "sessionId": "S1" }))
		.unwrap();

	let result = call.await.unwrap().unwrap();
	assert_eq!(result["frameId"], "F1");
}

#[tokio::test]
async fn test_error_response_becomes_remote_error() {
	let mut h = create_test_connection();

	let conn = Arc::clone(&h.connection);
	let call = tokio::spawn(async move { conn.send("Target.attachToTarget", json!({}), None).await });

	let request = h.outbound.recv().await.unwrap();
	h.inbound
		.send(json!({
			"id": request["id"],
			"error": { "code": -32602, "message": "Invalid parameters", "data": "targetId: string value expected" }
		}))
		.unwrap();

	match call.await.unwrap() {
		Err(Error::Remote { method, code, message }) => {
			assert_eq!(method, "Target.attachToTarget");
			assert_eq!(code, -32602);
			assert!(message.contains("targetId"), "{message}");
		}
		other => panic!("unexpected result: {other:?}"),
	}
}

#[tokio::test]
async fn test_events_reach_subscribers() {
	let h = create_test_connection();
	let mut events = h.connection.subscribe();

	h.inbound
		.send(json!({ "method": "Page.domContentEventFired", "params": { "timestamp": 12.5 }, "sessionId": "S1" }))
		.unwrap();

	let event = events.recv().await.unwrap();
	assert_eq!(event.method, "Page.domContentEventFired");
	assert_eq!(event.session_id.as_deref(), Some("S1"));
	assert_eq!(event.params["timestamp"], 12.5);
}

#[tokio::test]
async fn test_unknown_response_id_is_ignored() {
	let mut h = create_test_connection();

	h.inbound.send(json!({ "id": 999, "result": {} })).unwrap();

	let conn = Arc::clone(&h.connection);
	let call = tokio::spawn(async move { conn.send("Runtime.enable", json!({}), None).await });
	let request = h.outbound.recv().await.unwrap();
	h.inbound.send(json!({ "id": request["id"], "result": {} })).unwrap();

	assert!(call.await.unwrap().is_ok());
}

#[tokio::test]
async fn test_pending_requests_fail_when_connection_closes() {
	let mut h = create_test_connection();

	let conn = Arc::clone(&h.connection);
	let call = tokio::spawn(async move { conn.send("Runtime.evaluate", json!({}), None).await });
	let _request = h.outbound.recv().await.unwrap();

	drop(h.inbound);

	let result = tokio::time::timeout(Duration::from_secs(5), call).await.unwrap().unwrap();
	assert!(matches!(result, Err(Error::ChannelClosed)));
	assert!(h.connection.is_closed());

	let after = h.connection.send("Runtime.evaluate", json!({}), None).await;
	assert!(matches!(after, Err(Error::ChannelClosed)));
}

#[tokio::test]
async fn test_dropped_request_removes_callback() {
	let mut h = create_test_connection();

	let conn = Arc::clone(&h.connection);
	let call = tokio::spawn(async move { conn.send("Page.enable", json!({}), None).await });
	let _request = h.outbound.recv().await.unwrap();
	assert_eq!(h.connection.callbacks.lock().await.len(), 1);

	call.abort();
	let _ = call.await;

	for _ in 0..50 {
		if h.connection.callbacks.lock().await.is_empty() {
			return;
		}
		tokio::task::yield_now().await;
	}
	panic!("callback was not cleaned up after cancellation");
}

//! In-process stand-in for a browser, used by unit tests.

use std::sync::{Arc, Mutex};

use dx_runtime::{Connection, Error, TransportFuture, TransportParts, TransportReceiver, TransportSender};
use serde_json::{Value, json};
use tokio::sync::mpsc;

/// What the fake browser answers to one command.
pub(crate) enum Reply {
	/// Successful result.
	Ok(Value),
	/// Successful result followed by event frames (method, params) on the same session.
	OkThenEvents(Value, Vec<(&'static str, Value)>),
	/// Protocol error response.
	Err(i64, &'static str),
	/// Never answer.
	Silent,
}

pub(crate) struct FakeBrowser {
	pub connection: Arc<Connection>,
	/// Every command frame received, in order.
	pub commands: Arc<Mutex<Vec<Value>>>,
}

impl FakeBrowser {
	pub fn methods(&self) -> Vec<String> {
		self.commands
			.lock()
			.unwrap()
			.iter()
			.map(|c| c["method"].as_str().unwrap_or_default().to_string())
			.collect()
	}
}

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

struct IdleReceiver;

impl TransportReceiver for IdleReceiver {
	fn run(self: Box<Self>) -> TransportFuture<'static> {
		Box::pin(async { Ok(()) })
	}
}

/// Starts a connection whose commands are answered by `handler`.
pub(crate) fn fake_browser<H>(mut handler: H) -> FakeBrowser
where
	H: FnMut(&Value) -> Reply + Send + 'static,
{
	let (out_tx, mut outbound) = mpsc::unbounded_channel::<Value>();
	let (inbound, message_rx) = mpsc::unbounded_channel::<Value>();

	let connection = Arc::new(Connection::new(TransportParts {
		sender: Box::new(ChannelSender(out_tx)),
		receiver: Box::new(IdleReceiver),
		message_rx,
	}));

	let runner = Arc::clone(&connection);
	tokio::spawn(async move { runner.run().await });

	let commands = Arc::new(Mutex::new(Vec::new()));
	let log = Arc::clone(&commands);

	tokio::spawn(async move {
		while let Some(command) = outbound.recv().await {
			log.lock().unwrap().push(command.clone());
			let id = command["id"].clone();
			let session = command.get("sessionId").cloned().unwrap_or(Value::Null);

			let frames = match handler(&command) {
				Reply::Ok(result) => vec![json!({ "id": id, "result": result, "sessionId": session })],
				Reply::OkThenEvents(result, events) => {
					let mut frames = vec![json!({ "id": id, "result": result, "sessionId": session })];
					frames.extend(
						events
							.into_iter()
							.map(|(method, params)| json!({ "method": method, "params": params, "sessionId": session })),
					);
					frames
				}
				Reply::Err(code, message) => {
					vec![json!({ "id": id, "error": { "code": code, "message": message } })]
				}
				Reply::Silent => Vec::new(),
			};

			for frame in frames {
				if inbound.send(frame).is_err() {
					return;
				}
			}
		}
	});

	FakeBrowser { connection, commands }
}

/// Result payload of a `Runtime.evaluate` returning `value`.
pub(crate) fn evaluated(value: Value) -> Value {
	json!({ "result": { "type": "object", "value": value } })
}

/// Result payload of a `Runtime.evaluate` that threw `description`.
pub(crate) fn thrown(description: &str) -> Value {
	json!({
		"result": { "type": "object", "subtype": "error" },
		"exceptionDetails": {
			"text": "Uncaught",
			"exception": { "type": "object", "subtype": "error", "description": description }
		}
	})
}

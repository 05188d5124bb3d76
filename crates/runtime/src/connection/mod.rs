//! DevTools connection layer
//!
//! Implements request/response correlation on top of the transport:
//! - Generating unique request IDs
//! - Correlating responses with pending requests
//! - Distinguishing events from responses
//! - Fanning events out to subscribers
//!
//! # Message Flow
//!
//! 1. Caller invokes [`Connection::send`] with method, params and optional session
//! 2. Connection allocates an ID and parks a oneshot sender under it
//! 3. The request is queued for the writer task
//! 4. The dispatch loop receives the matching response and completes the oneshot
//! 5. Events are broadcast; subscribers filter by method and session

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::task::{Context, Poll};

use dx_protocol::{Event, Message, Request};
use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::error::{Error, Result};
use crate::transport::TransportParts;

/// Capacity of the event broadcast; slow subscribers skip ahead rather than block dispatch.
const EVENT_CAPACITY: usize = 1024;

struct Pending {
	method: String,
	tx: oneshot::Sender<Result<Value>>,
}

/// Pending request callbacks keyed by request ID.
type CallbackMap = Arc<TokioMutex<HashMap<u64, Pending>>>;

/// RAII guard ensuring callback cleanup when a request future is dropped.
struct CancelGuard {
	id: u64,
	callbacks: CallbackMap,
	completed: bool,
}

impl CancelGuard {
	fn new(id: u64, callbacks: CallbackMap) -> Self {
		Self {
			id,
			callbacks,
			completed: false,
		}
	}

	fn complete(&mut self) {
		self.completed = true;
	}
}

impl Drop for CancelGuard {
	fn drop(&mut self) {
		if self.completed {
			return;
		}

		let id = self.id;
		let callbacks = Arc::clone(&self.callbacks);

		if let Ok(handle) = tokio::runtime::Handle::try_current() {
			handle.spawn(async move {
				if callbacks.lock().await.remove(&id).is_some() {
					tracing::debug!(id, "CancelGuard: removed orphaned callback");
				}
			});
		}
	}
}

/// Future returned by [`Connection::send`] with automatic cancellation cleanup.
struct ResponseFuture {
	rx: oneshot::Receiver<Result<Value>>,
	guard: CancelGuard,
}

impl Future for ResponseFuture {
	type Output = Result<Value>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Ready(result) => {
				self.guard.complete();
				Poll::Ready(result.map_err(|_| Error::ChannelClosed).and_then(|r| r))
			}
			Poll::Pending => Poll::Pending,
		}
	}
}

/// Connection to a browser's DevTools endpoint.
///
/// Uses sequential request IDs and oneshot channels for correlation. A single
/// connection serves the browser target and every attached page session.
pub struct Connection {
	/// Sequential request ID counter
	last_id: AtomicU64,
	/// Pending request callbacks keyed by request ID
	callbacks: CallbackMap,
	/// Channel for sending outbound messages to the writer task
	outbound_tx: mpsc::UnboundedSender<Value>,
	/// Event fan-out
	events: broadcast::Sender<Event>,
	/// Set once the dispatch loop has exited
	closed: AtomicBool,
	/// Transport halves and outbound receiver (taken by run())
	parts: TokioMutex<Option<(TransportParts, mpsc::UnboundedReceiver<Value>)>>,
}

impl Connection {
	/// Create a new Connection over the given transport.
	pub fn new(parts: TransportParts) -> Self {
		let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
		let (events, _) = broadcast::channel(EVENT_CAPACITY);

		Self {
			last_id: AtomicU64::new(1),
			callbacks: Arc::new(TokioMutex::new(HashMap::new())),
			outbound_tx,
			events,
			closed: AtomicBool::new(false),
			parts: TokioMutex::new(Some((parts, outbound_rx))),
		}
	}

	/// Subscribes to every event received after this call.
	pub fn subscribe(&self) -> broadcast::Receiver<Event> {
		self.events.subscribe()
	}

	/// Returns true once the dispatch loop has stopped.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	/// Sends a command and awaits its result.
	///
	/// `session_id` routes the command to an attached target; `None` addresses the browser.
	pub async fn send(&self, method: &str, params: Value, session_id: Option<&str>) -> Result<Value> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);

		tracing::debug!(id, method, session = session_id.unwrap_or("-"), "Sending command");

		let (tx, rx) = oneshot::channel();
		self.callbacks.lock().await.insert(
			id,
			Pending {
				method: method.to_string(),
				tx,
			},
		);

		let guard = CancelGuard::new(id, Arc::clone(&self.callbacks));

		if self.is_closed() {
			return Err(Error::ChannelClosed);
		}

		let request = Request {
			id,
			method: method.to_string(),
			params,
			session_id: session_id.map(str::to_string),
		};

		let request_value = serde_json::to_value(&request)?;

		if self.outbound_tx.send(request_value).is_err() {
			tracing::error!("Failed to queue message: outbound channel closed");
			return Err(Error::ChannelClosed);
		}

		ResponseFuture { rx, guard }.await
	}

	/// Runs the writer task, reader task and dispatch loop until the transport closes.
	///
	/// May only be called once; later calls return immediately.
	pub async fn run(self: &Arc<Self>) {
		let Some((parts, mut outbound_rx)) = self.parts.lock().await.take() else {
			tracing::warn!("Connection::run called more than once");
			return;
		};

		let TransportParts {
			mut sender,
			receiver,
			mut message_rx,
		} = parts;

		let reader_handle = tokio::spawn(async move {
			if let Err(e) = receiver.run().await {
				tracing::debug!("Transport read error: {}", e);
			}
		});

		let writer_handle = tokio::spawn(async move {
			while let Some(message) = outbound_rx.recv().await {
				if let Err(e) = sender.send(message).await {
					tracing::error!("Transport write error: {}", e);
					break;
				}
			}
			let _ = sender.close().await;
		});

		while let Some(message_value) = message_rx.recv().await {
			match serde_json::from_value::<Message>(message_value) {
				Ok(message) => self.dispatch(message).await,
				Err(e) => tracing::error!("Failed to parse message: {}", e),
			}
		}

		self.closed.store(true, Ordering::SeqCst);
		let orphaned = std::mem::take(&mut *self.callbacks.lock().await);
		if !orphaned.is_empty() {
			tracing::debug!(count = orphaned.len(), "failing pending requests: connection closed");
		}
		drop(orphaned);

		writer_handle.abort();
		let _ = reader_handle.await;
	}

	async fn dispatch(&self, message: Message) {
		match message {
			Message::Response(response) => {
				let Some(pending) = self.callbacks.lock().await.remove(&response.id) else {
					tracing::debug!(id = response.id, "Response for unknown request (ignored)");
					return;
				};

				let result = match response.error {
					Some(error) => Err(Error::Remote {
						method: pending.method,
						code: error.code,
						message: match error.data {
							Some(data) => format!("{} ({data})", error.message),
							None => error.message,
						},
					}),
					None => Ok(response.result.unwrap_or(Value::Null)),
				};

				let _ = pending.tx.send(result);
			}
			Message::Event(event) => {
				tracing::trace!(method = %event.method, session = event.session_id.as_deref().unwrap_or("-"), "event");
				// No subscribers is fine; the send error only signals that.
				let _ = self.events.send(event);
			}
			Message::Unknown(value) => {
				tracing::debug!("Unknown message type (forward-compatible, ignored): {}", value);
			}
		}
	}
}

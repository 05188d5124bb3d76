//! WebSocket transport for DevTools frames.
//!
//! The transport is split into a sender and a receiver so the connection can
//! own the writer and reader on separate tasks. The receiver pushes every
//! decoded JSON frame into an unbounded channel that the connection drains.


use std::future::Future;
use std::pin::Pin;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::protocol::WebSocketConfig;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Upper bound for a single frame; exported SVGs of large views can run to tens of megabytes.
const MAX_MESSAGE_SIZE: usize = 256 << 20;

/// Boxed future returned by transport halves.
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Outbound half of a transport.
pub trait TransportSender: Send {
	/// Serializes and sends one frame.
	fn send(&mut self, message: Value) -> TransportFuture<'_>;

	/// Starts a graceful close.
	fn close(&mut self) -> TransportFuture<'_>;
}

/// Inbound half of a transport.
pub trait TransportReceiver: Send {
	/// Reads frames until the peer closes, forwarding them to the message channel.
	fn run(self: Box<Self>) -> TransportFuture<'static>;
}

/// Everything a [`Connection`](crate::Connection) needs from a transport.
pub struct TransportParts {
	pub sender: Box<dyn TransportSender>,
	pub receiver: Box<dyn TransportReceiver>,
	pub message_rx: mpsc::UnboundedReceiver<Value>,
}

/// Writes JSON frames as WebSocket text messages.
pub struct WebSocketTransportSender<S> {
	sink: S,
}

impl<S> WebSocketTransportSender<S> {
	pub fn new(sink: S) -> Self {
		Self { sink }
	}
}

impl<S> TransportSender for WebSocketTransportSender<S>
where
	S: Sink<WsMessage, Error = WsError> + Unpin + Send,
{
	fn send(&mut self, message: Value) -> TransportFuture<'_> {
		Box::pin(async move {
			let text = serde_json::to_string(&message)?;
			self.sink
				.send(WsMessage::text(text))
				.await
				.map_err(|e| Error::TransportError(e.to_string()))
		})
	}

	fn close(&mut self) -> TransportFuture<'_> {
		Box::pin(async move {
			self.sink
				.close()
				.await
				.map_err(|e| Error::TransportError(e.to_string()))
		})
	}
}

/// Reads WebSocket text messages and forwards them as parsed JSON.
pub struct WebSocketTransportReceiver<S> {
	stream: S,
	message_tx: mpsc::UnboundedSender<Value>,
}

impl<S> WebSocketTransportReceiver<S> {
	pub fn new(stream: S, message_tx: mpsc::UnboundedSender<Value>) -> Self {
		Self { stream, message_tx }
	}
}

impl<S> TransportReceiver for WebSocketTransportReceiver<S>
where
	S: Stream<Item = std::result::Result<WsMessage, WsError>> + Unpin + Send + 'static,
{
	fn run(mut self: Box<Self>) -> TransportFuture<'static> {
		Box::pin(async move {
			while let Some(frame) = self.stream.next().await {
				let frame = match frame {
					Ok(frame) => frame,
					Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
					Err(e) => return Err(Error::TransportError(e.to_string())),
				};

				match frame {
					WsMessage::Text(text) => {
						let value: Value = match serde_json::from_str(&text) {
							Ok(value) => value,
							Err(e) => {
								warn!(target = "dx", "dropping malformed frame: {e}");
								continue;
							}
						};
						if self.message_tx.send(value).is_err() {
							break;
						}
					}
					WsMessage::Close(reason) => {
						debug!(target = "dx", ?reason, "websocket closed by browser");
						break;
					}
					_ => {}
				}
			}
			Ok(())
		})
	}
}

/// Builds transport halves over an already-established WebSocket stream.
pub fn split_websocket<T>(socket: T) -> TransportParts
where
	T: Stream<Item = std::result::Result<WsMessage, WsError>> + Sink<WsMessage, Error = WsError> + Unpin + Send + 'static,
{
	let (sink, stream) = socket.split();
	let (message_tx, message_rx) = mpsc::unbounded_channel();

	TransportParts {
		sender: Box::new(WebSocketTransportSender::new(sink)),
		receiver: Box::new(WebSocketTransportReceiver::new(stream, message_tx)),
		message_rx,
	}
}

/// Opens the browser's DevTools WebSocket.
pub async fn connect_websocket(url: &str) -> Result<TransportParts> {
	let mut config = WebSocketConfig::default();
	config.max_message_size = Some(MAX_MESSAGE_SIZE);
	config.max_frame_size = Some(MAX_MESSAGE_SIZE);

	let (socket, _) = tokio_tungstenite::connect_async_with_config(url, Some(config), true)
		.await
		.map_err(|e| Error::ConnectionFailed(format!("{url}: {e}")))?;

	debug!(target = "dx", %url, "websocket connected");
	Ok(split_websocket(socket))
}

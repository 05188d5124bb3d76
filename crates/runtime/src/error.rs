//! Error types for the browser runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the browser.
#[derive(Debug, Error)]
pub enum Error {
	/// No Chromium-family executable was found.
	#[error("No Chrome/Chromium executable found. Install Chrome or pass --chrome <PATH> (or set CHROME_PATH)")]
	BrowserNotFound,

	/// The browser process could not be started or never exposed its DevTools endpoint.
	#[error("Failed to launch browser: {0}")]
	LaunchFailed(String),

	/// Failed to open the DevTools WebSocket.
	#[error("Failed to connect to browser: {0}")]
	ConnectionFailed(String),

	/// Transport-level error (WebSocket read/write).
	#[error("Transport error: {0}")]
	TransportError(String),

	/// Malformed or unexpected protocol traffic.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// The browser rejected a command.
	#[error("{method} failed ({code}): {message}")]
	Remote {
		method: String,
		code: i64,
		message: String,
	},

	/// A script evaluated in the page threw.
	#[error("JavaScript evaluation failed: {0}")]
	JsEval(String),

	/// The browser could not start navigating to a URL.
	#[error("Navigation to '{url}' failed: {reason}")]
	Navigation { url: String, reason: String },

	/// A bounded wait elapsed.
	#[error("Timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	/// Channel closed unexpectedly (browser exited or connection dropped).
	#[error("Channel closed unexpectedly")]
	ChannelClosed,

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout { .. })
	}

	/// Returns true if the browser side went away.
	pub fn is_closed(&self) -> bool {
		matches!(self, Error::ChannelClosed | Error::TransportError(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timeout_message_names_condition() {
		let err = Error::Timeout {
			ms: 30_000,
			condition: "diagram rendered".into(),
		};
		assert!(err.is_timeout());
		assert_eq!(err.to_string(), "Timeout after 30000ms waiting for: diagram rendered");
	}

	#[test]
	fn remote_message_includes_method() {
		let err = Error::Remote {
			method: "Page.navigate".into(),
			code: -32000,
			message: "Cannot navigate to invalid URL".into(),
		};
		assert_eq!(err.to_string(), "Page.navigate failed (-32000): Cannot navigate to invalid URL");
		assert!(!err.is_timeout());
	}

	#[test]
	fn closed_classification() {
		assert!(Error::ChannelClosed.is_closed());
		assert!(!Error::BrowserNotFound.is_closed());
	}
}

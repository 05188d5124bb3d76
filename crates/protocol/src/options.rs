//! Option structs for page operations.

use serde::{Deserialize, Serialize};

use crate::types::WaitUntil;

/// Default timeout in milliseconds for navigation and readiness waits.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Navigation options for `Page::goto`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GotoOptions {
	/// Maximum time to wait for the load state, in milliseconds
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timeout: Option<u64>,

	/// When to consider navigation succeeded
	#[serde(skip_serializing_if = "Option::is_none")]
	pub wait_until: Option<WaitUntil>,

	/// Referer header value
	#[serde(skip_serializing_if = "Option::is_none")]
	pub referer: Option<String>,
}

impl GotoOptions {
	/// Creates new default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the timeout.
	pub fn timeout(mut self, timeout_ms: u64) -> Self {
		self.timeout = Some(timeout_ms);
		self
	}

	/// Sets the wait_until condition.
	pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
		self.wait_until = Some(wait_until);
		self
	}

	/// Sets the referer header.
	pub fn referer(mut self, referer: impl Into<String>) -> Self {
		self.referer = Some(referer.into());
		self
	}

	/// Effective timeout, falling back to [`DEFAULT_TIMEOUT_MS`].
	pub fn timeout_ms(&self) -> u64 {
		self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS)
	}
}

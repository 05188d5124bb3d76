//! Polling wait primitive.
//!
//! The page's "diagram rendered" flag is a plain variable, not an event, so
//! readiness is observed by re-evaluating a predicate on an interval. The same
//! primitive serves the initial page load and every view switch.

use std::future::Future;
use std::time::Duration;

use dx_protocol::DEFAULT_TIMEOUT_MS;
use tokio::time::Instant;

use crate::{Error, Result};

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
	/// Delay between two evaluations of the condition.
	pub poll_interval: Duration,
	/// Upper bound for the whole wait; `None` waits indefinitely.
	pub timeout: Option<Duration>,
}

impl WaitOptions {
	pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

	pub fn bounded(timeout: Duration) -> Self {
		Self {
			poll_interval: Self::DEFAULT_POLL_INTERVAL,
			timeout: Some(timeout),
		}
	}

	pub fn unbounded() -> Self {
		Self {
			poll_interval: Self::DEFAULT_POLL_INTERVAL,
			timeout: None,
		}
	}

	/// Treats a zero timeout as "no bound", matching the CLI flag semantics.
	pub fn from_millis(timeout_ms: u64, poll_interval_ms: u64) -> Self {
		Self {
			poll_interval: Duration::from_millis(poll_interval_ms.max(1)),
			timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
		}
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}
}

impl Default for WaitOptions {
	fn default() -> Self {
		Self::bounded(Duration::from_millis(DEFAULT_TIMEOUT_MS))
	}
}

/// Evaluates `condition` until it yields `true`.
///
/// Returns the elapsed time. Errors from the condition abort the wait
/// immediately; exceeding [`WaitOptions::timeout`] yields [`Error::Timeout`]
/// naming `description`.
pub async fn poll_until<F, Fut>(mut condition: F, options: &WaitOptions, description: &str) -> Result<Duration>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<bool>>,
{
	let started = Instant::now();
	let interval = options.poll_interval;

	let polling = async {
		let mut attempts: u64 = 0;
		loop {
			attempts += 1;
			if condition().await? {
				tracing::debug!(attempts, elapsed_ms = started.elapsed().as_millis() as u64, "{description}: satisfied");
				return Ok(started.elapsed());
			}
			tokio::time::sleep(interval).await;
		}
	};

	match options.timeout {
		None => polling.await,
		Some(limit) => match tokio::time::timeout(limit, polling).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout {
				ms: limit.as_millis() as u64,
				condition: description.to_string(),
			}),
		},
	}
}

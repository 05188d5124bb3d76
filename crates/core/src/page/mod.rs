//! [`Page`] handle representing one browser tab.

mod eval;
mod wait;

pub(crate) use wait::guarded_predicate;


use std::sync::Arc;
use std::time::Duration;

use dx_protocol::{Event, GotoOptions, NavigateResult, Viewport};
use dx_runtime::Connection;
use serde_json::{Value, json};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use crate::{Error, Result};

/// A page target attached to the browser connection in flat-session mode.
///
/// Every command is routed with the page's `sessionId`; the page never owns
/// the connection, so dropping it leaves the browser untouched.
#[derive(Clone)]
pub struct Page {
	connection: Arc<Connection>,
	target_id: String,
	session_id: String,
}

impl Page {
	pub(crate) fn new(connection: Arc<Connection>, target_id: String, session_id: String) -> Self {
		Self {
			connection,
			target_id,
			session_id,
		}
	}

	pub fn target_id(&self) -> &str {
		&self.target_id
	}

	pub fn session_id(&self) -> &str {
		&self.session_id
	}

	/// Sends a command on this page's session.
	pub async fn send(&self, method: &str, params: Value) -> Result<Value> {
		self.connection.send(method, params, Some(&self.session_id)).await
	}

	/// Turns on `Page` domain events (load state notifications).
	pub async fn enable(&self) -> Result<()> {
		self.send("Page.enable", json!({})).await?;
		Ok(())
	}

	/// Fixes the rendering surface size so exports do not depend on the default window.
	pub async fn set_viewport(&self, viewport: Viewport) -> Result<()> {
		self.send("Emulation.setDeviceMetricsOverride", serde_json::to_value(viewport)?)
			.await?;
		Ok(())
	}

	/// Accepts invalid and self-signed certificates for this page.
	pub async fn ignore_certificate_errors(&self) -> Result<()> {
		self.send("Security.setIgnoreCertificateErrors", json!({ "ignore": true }))
			.await?;
		Ok(())
	}

	/// Navigates to `url` and waits for the requested load state.
	///
	/// # Errors
	///
	/// Returns [`Error::Navigation`] when the browser reports a navigation
	/// failure, and [`Error::Timeout`] if the browser does not answer or the
	/// load state is not reached within the options' timeout.
	pub async fn goto(&self, url: &str, options: GotoOptions) -> Result<()> {
		let wait_until = options.wait_until.unwrap_or_default();
		let timeout_ms = options.timeout_ms();

		// Subscribe before navigating so a fast load event cannot slip past.
		let mut events = self.connection.subscribe();

		let mut params = json!({ "url": url });
		if let Some(referer) = &options.referer {
			params["referrer"] = json!(referer);
		}

		debug!(target = "dx", %url, ?wait_until, "navigate");
		let event_name = wait_until.event_name();
		let navigation = self.navigate_and_wait(url, params, event_name, &mut events);

		// One deadline covers the navigate reply and the load event.
		match tokio::time::timeout(Duration::from_millis(timeout_ms), navigation).await {
			Ok(result) => result,
			Err(_) => Err(Error::Timeout {
				ms: timeout_ms,
				condition: format!("{} after navigating to {url}", event_name.unwrap_or("Page.navigate reply")),
			}),
		}
	}

	async fn navigate_and_wait(
		&self,
		url: &str,
		params: Value,
		event_name: Option<&'static str>,
		events: &mut broadcast::Receiver<Event>,
	) -> Result<()> {
		let navigated: NavigateResult = serde_json::from_value(self.send("Page.navigate", params).await?)?;

		if let Some(reason) = navigated.error_text.filter(|text| !text.is_empty()) {
			return Err(Error::Navigation {
				url: url.to_string(),
				reason,
			});
		}

		let Some(event_name) = event_name else {
			return Ok(());
		};

		if navigated.loader_id.is_none() {
			debug!(target = "dx", %url, "same-document navigation, no load event expected");
			return Ok(());
		}

		loop {
			match events.recv().await {
				Ok(event) if event.method == event_name && event.session_id.as_deref() == Some(self.session_id.as_str()) => {
					return Ok(());
				}
				Ok(_) => {}
				Err(RecvError::Lagged(skipped)) => {
					debug!(target = "dx", skipped, "event subscriber lagged");
				}
				Err(RecvError::Closed) => return Err(Error::ChannelClosed),
			}
		}
	}

	/// Closes the tab.
	pub async fn close(&self) -> Result<()> {
		self.connection
			.send("Target.closeTarget", json!({ "targetId": self.target_id }), None)
			.await?;
		Ok(())
	}
}

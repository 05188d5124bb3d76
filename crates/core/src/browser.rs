//! [`Browser`]: a launched browser process plus its DevTools connection.

use std::sync::Arc;
use std::time::Duration;

use dx_protocol::{AttachToTargetResult, CreateTargetResult};
use dx_runtime::{BrowserProcess, Connection, LaunchOptions, connect_websocket};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{Page, Result};

/// Grace period for the browser to acknowledge `Browser.close`.
const CLOSE_ACK_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Browser {
	process: Option<BrowserProcess>,
	connection: Arc<Connection>,
	dispatch: JoinHandle<()>,
}

impl Browser {
	/// Launches a browser and connects to its DevTools endpoint.
	pub async fn launch(options: &LaunchOptions) -> Result<Self> {
		let process = BrowserProcess::launch(options).await?;

		let parts = match connect_websocket(process.ws_url()).await {
			Ok(parts) => parts,
			Err(e) => {
				let _ = process.kill().await;
				return Err(e);
			}
		};

		let mut browser = Self::from_connection(Arc::new(Connection::new(parts)));
		browser.process = Some(process);
		Ok(browser)
	}

	/// Wraps an existing connection and starts its dispatch loop.
	pub(crate) fn from_connection(connection: Arc<Connection>) -> Self {
		let runner = Arc::clone(&connection);
		let dispatch = tokio::spawn(async move { runner.run().await });

		Self {
			process: None,
			connection,
			dispatch,
		}
	}

	/// Wraps a connection whose dispatch loop is already running elsewhere.
	#[cfg(test)]
	pub(crate) fn detached(connection: Arc<Connection>) -> Self {
		Self {
			process: None,
			connection,
			dispatch: tokio::spawn(async {}),
		}
	}

	pub fn connection(&self) -> &Arc<Connection> {
		&self.connection
	}

	/// Opens a blank tab and attaches to it.
	pub async fn new_page(&self) -> Result<Page> {
		let created: CreateTargetResult = serde_json::from_value(
			self.connection
				.send("Target.createTarget", json!({ "url": "about:blank" }), None)
				.await?,
		)?;

		let attached: AttachToTargetResult = serde_json::from_value(
			self.connection
				.send(
					"Target.attachToTarget",
					json!({ "targetId": created.target_id, "flatten": true }),
					None,
				)
				.await?,
		)?;

		debug!(target = "dx", target_id = %created.target_id, session_id = %attached.session_id, "page attached");

		let page = Page::new(Arc::clone(&self.connection), created.target_id, attached.session_id);
		page.enable().await?;
		Ok(page)
	}

	/// Asks the browser to exit and reaps the process.
	///
	/// The browser may drop the socket before acknowledging `Browser.close`,
	/// so a missing acknowledgement is not an error.
	pub async fn close(mut self) -> Result<()> {
		if !self.connection.is_closed() {
			match tokio::time::timeout(CLOSE_ACK_TIMEOUT, self.connection.send("Browser.close", json!({}), None)).await {
				Ok(Ok(_)) => debug!(target = "dx", "browser acknowledged close"),
				Ok(Err(e)) => debug!(target = "dx", "browser closed without acknowledgement: {e}"),
				Err(_) => debug!(target = "dx", "no close acknowledgement within {}ms", CLOSE_ACK_TIMEOUT.as_millis()),
			}
		}

		let result = match self.process.take() {
			Some(process) => process.shutdown().await,
			None => Ok(()),
		};

		self.dispatch.abort();
		result
	}
}

//! Scoped browser sessions.
//!
//! A [`Session`] is one browser process with one configured page. Callers go
//! through [`with_session`] so the browser is shut down on every exit path,
//! including errors raised by the session body.

use std::future::Future;
use std::pin::Pin;

use dx_protocol::Viewport;
use dx_runtime::LaunchOptions;
use tracing::{debug, warn};

use crate::{Browser, Error, Page, Result};

/// Fully owned session configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
	/// Browser process options.
	pub launch: LaunchOptions,
	/// Emulated rendering surface for the page.
	pub viewport: Viewport,
}

impl SessionConfig {
	/// Whether certificate errors are ignored, both at launch and on the page.
	pub fn ignore_https_errors(&self) -> bool {
		self.launch.ignore_https_errors
	}
}

/// Browser plus the single page the session works on.
pub struct Session {
	browser: Browser,
	page: Page,
}

impl Session {
	/// Launches the browser and prepares a page according to `config`.
	pub async fn open(config: &SessionConfig) -> Result<Self> {
		let browser = Browser::launch(&config.launch).await?;
		Self::prepare(browser, config).await
	}

	/// Sets up the page on a running browser, closing the browser if setup fails.
	pub(crate) async fn prepare(browser: Browser, config: &SessionConfig) -> Result<Self> {
		match prepare_page(&browser, config).await {
			Ok(page) => Ok(Self { browser, page }),
			Err(e) => {
				if let Err(close_err) = browser.close().await {
					warn!(target = "dx", "failed to close browser after setup error: {close_err}");
				}
				Err(e)
			}
		}
	}

	#[cfg(test)]
	pub(crate) fn from_parts(browser: Browser, page: Page) -> Self {
		Self { browser, page }
	}

	pub fn page(&self) -> &Page {
		&self.page
	}

	pub fn browser(&self) -> &Browser {
		&self.browser
	}

	/// Closes the page and shuts the browser down.
	pub async fn close(self) -> Result<()> {
		if let Err(e) = self.page.close().await {
			debug!(target = "dx", "page close failed: {e}");
		}
		self.browser.close().await
	}

	/// Closes the session and passes `result` through.
	///
	/// The result's error wins over a close error; a close error on the
	/// success path is returned.
	pub async fn finish<T, E>(self, result: std::result::Result<T, E>) -> std::result::Result<T, E>
	where
		E: From<Error>,
	{
		match result {
			Ok(value) => {
				self.close().await?;
				Ok(value)
			}
			Err(e) => {
				if let Err(close_err) = self.close().await {
					warn!(target = "dx", "failed to close browser session: {close_err}");
				}
				Err(e)
			}
		}
	}
}

async fn prepare_page(browser: &Browser, config: &SessionConfig) -> Result<Page> {
	let page = browser.new_page().await?;
	if config.ignore_https_errors() {
		page.ignore_certificate_errors().await?;
	}
	page.set_viewport(config.viewport).await?;
	Ok(page)
}

/// Boxed future borrowed from a session.
pub type SessionFuture<'s, T, E> = Pin<Box<dyn Future<Output = std::result::Result<T, E>> + 's>>;

/// Runs `body` against a freshly opened session and always closes it afterwards.
///
/// See [`Session::finish`] for which error is reported.
pub async fn with_session<T, E>(
	config: &SessionConfig,
	body: impl for<'s> FnOnce(&'s Session) -> SessionFuture<'s, T, E>,
) -> std::result::Result<T, E>
where
	E: From<Error>,
{
	let session = Session::open(config).await?;
	run_scoped(session, body).await
}

/// Runs `body` against an open session, then closes it.
pub(crate) async fn run_scoped<T, E>(
	session: Session,
	body: impl for<'s> FnOnce(&'s Session) -> SessionFuture<'s, T, E>,
) -> std::result::Result<T, E>
where
	E: From<Error>,
{
	let result = body(&session).await;
	session.finish(result).await
}

//! Structurizr diagram export.
//!
//! Opens a Structurizr diagram viewer in a headless browser, waits for the
//! renderer, then switches through every view in list order and writes each
//! one to `<output>/<prefix>-<workspace>-<key>.svg`.
//!
//! ```text
//!  export_diagrams ── Session::open ──► export_workspace(page) ──► Session::finish
//!                                         │  goto(url, DOMContentLoaded)
//!                                         ▼
//!                                      export_views(&dyn Scripting)
//!                                         │  wait rendered ─► views()
//!                                         │  for view: change_view ─► wait rendered
//!                                         │            ─► export_svg ─► write file
//!                                         ▼
//!                                      ExportSummary
//! ```
//!
//! All in-page calls go through [`Scripting`], so the orchestration runs
//! unchanged against a scripted fake.

mod naming;
mod scripting;


use std::fmt;
use std::path::{Path, PathBuf};

use dx_protocol::{DEFAULT_TIMEOUT_MS, GotoOptions, WaitUntil};
use thiserror::Error;
use tracing::{debug, info};

pub use self::naming::OutputNaming;
pub use self::scripting::{PageScripting, RENDERED_PREDICATE, Scripting, View};
use crate::session::{Session, SessionConfig};
use crate::wait::{WaitOptions, poll_until};
use crate::{Error, Page};

#[derive(Debug, Error)]
pub enum ExportError {
	#[error(transparent)]
	Browser(#[from] Error),

	#[error("cannot write {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("view key {0:?} cannot be used as a file name")]
	InvalidViewKey(String),
}

/// Everything a run needs besides the browser session.
#[derive(Debug, Clone)]
pub struct ExportConfig {
	pub output_dir: PathBuf,
	pub naming: OutputNaming,
	/// Bound for the page load and the first "diagram rendered" signal.
	pub ready: WaitOptions,
	/// Bound for each view switch.
	pub render: WaitOptions,
	/// Embed Structurizr metadata in the exported SVG.
	pub include_metadata: bool,
}

impl ExportConfig {
	pub fn new(output_dir: impl Into<PathBuf>) -> Self {
		Self {
			output_dir: output_dir.into(),
			naming: OutputNaming::default(),
			ready: WaitOptions::default(),
			render: WaitOptions::default(),
			include_metadata: true,
		}
	}
}

/// Result of a completed run. `files` is in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
	pub exported: usize,
	pub files: Vec<PathBuf>,
}

/// Progress notifications, one per console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEvent {
	Starting,
	Opening(String),
	Found(usize),
	ExportingTo(PathBuf),
	Written(String),
	Exported(usize),
	Finished,
}

impl fmt::Display for ExportEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Starting => f.write_str("Starting export..."),
			Self::Opening(url) => write!(f, " - Opening {url}"),
			Self::Found(count) => write!(f, " - Found {count} diagrams to export"),
			Self::ExportingTo(dir) => write!(f, " - Starting export to {}", dir.display()),
			Self::Written(file) => write!(f, " - {file}"),
			Self::Exported(count) => write!(f, " - Exported {count} diagrams"),
			Self::Finished => f.write_str(" - Finished"),
		}
	}
}

/// Creates `dir` and any missing parents. Existing content is left alone.
pub async fn prepare_output_dir(dir: &Path) -> Result<(), ExportError> {
	tokio::fs::create_dir_all(dir)
		.await
		.map_err(|source| ExportError::Io {
			path: dir.to_path_buf(),
			source,
		})
}

/// Full run: prepares the output directory, opens a browser session, exports
/// every view of the workspace at `url` and closes the session on every path.
///
/// [`ExportEvent::Finished`] is left to the caller, after the session is gone.
pub async fn export_diagrams<P>(
	session: &SessionConfig,
	url: &str,
	config: ExportConfig,
	mut progress: P,
) -> Result<ExportSummary, ExportError>
where
	P: FnMut(&ExportEvent),
{
	prepare_output_dir(&config.output_dir).await?;
	progress(&ExportEvent::Starting);

	let session = Session::open(session).await?;
	export_in_session(session, url, &config, &mut progress).await
}

/// Exports through an open session, then closes it whatever the outcome.
pub(crate) async fn export_in_session(
	session: Session,
	url: &str,
	config: &ExportConfig,
	progress: &mut dyn FnMut(&ExportEvent),
) -> Result<ExportSummary, ExportError> {
	let result = export_workspace(session.page(), url, config, progress).await;
	session.finish(result).await
}

/// Navigates `page` to the diagram viewer and exports all views.
pub async fn export_workspace(
	page: &Page,
	url: &str,
	config: &ExportConfig,
	progress: &mut dyn FnMut(&ExportEvent),
) -> Result<ExportSummary, ExportError> {
	progress(&ExportEvent::Opening(url.to_string()));

	let navigation_ms = config
		.ready
		.timeout
		.map_or(DEFAULT_TIMEOUT_MS, |t| t.as_millis() as u64);
	page.goto(
		url,
		GotoOptions::new()
			.wait_until(WaitUntil::DomContentLoaded)
			.timeout(navigation_ms),
	)
	.await?;

	export_views(&PageScripting::new(page), config, progress).await
}

/// Exports every view reported by `scripting`, strictly one after another.
///
/// A view is switched only after the previous view's file has been written.
pub async fn export_views<S>(
	scripting: &S,
	config: &ExportConfig,
	progress: &mut dyn FnMut(&ExportEvent),
) -> Result<ExportSummary, ExportError>
where
	S: Scripting + ?Sized,
{
	let waited = poll_until(|| scripting.is_rendered(), &config.ready, "diagram renderer ready").await?;
	info!(target = "dx", waited_ms = waited.as_millis() as u64, "diagram viewer ready");

	let views = scripting.views().await?;
	progress(&ExportEvent::Found(views.len()));
	progress(&ExportEvent::ExportingTo(config.output_dir.clone()));

	let mut summary = ExportSummary::default();
	for view in &views {
		let file_name = config.naming.file_name(&view.key)?;

		scripting.change_view(&view.key).await?;
		let condition = format!("view {} rendered", view.key);
		poll_until(|| scripting.is_rendered(), &config.render, &condition).await?;

		let svg = scripting.export_svg(config.include_metadata).await?;
		let path = config.output_dir.join(&file_name);
		tokio::fs::write(&path, svg.as_bytes())
			.await
			.map_err(|source| ExportError::Io {
				path: path.clone(),
				source,
			})?;
		debug!(target = "dx", key = %view.key, kind = ?view.kind, bytes = svg.len(), "view exported");

		summary.exported += 1;
		summary.files.push(path);
		progress(&ExportEvent::Written(file_name));
	}

	progress(&ExportEvent::Exported(summary.exported));
	Ok(summary)
}

//! Browser process management
//!
//! Launches a Chromium-family browser with remote debugging on an ephemeral
//! port, reads the announced DevTools WebSocket URL from its stderr, and
//! tears the process down again. The child is spawned with `kill_on_drop`,
//! so a [`BrowserProcess`] dropped on an error path never outlives the run.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, Command};
use tracing::{debug, trace, warn};

use crate::driver::find_browser_executable;
use crate::error::{Error, Result};

const DEVTOOLS_PREFIX: &str = "DevTools listening on ";
const STDERR_TAIL_LINES: usize = 5;

/// How to start the browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
	/// Explicit executable; discovered when `None`.
	pub executable: Option<PathBuf>,
	/// Run without a visible window.
	pub headless: bool,
	/// Initial window size in CSS pixels.
	pub window_size: (u32, u32),
	/// Accept invalid or self-signed certificates.
	pub ignore_https_errors: bool,
	/// Maximum time to wait for the DevTools endpoint announcement.
	pub launch_timeout: Duration,
	/// Additional command-line switches appended verbatim.
	pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
	fn default() -> Self {
		Self {
			executable: None,
			headless: true,
			window_size: (1920, 1080),
			ignore_https_errors: true,
			launch_timeout: Duration::from_secs(20),
			extra_args: Vec::new(),
		}
	}
}

impl LaunchOptions {
	/// Command-line switches for a launch using `profile_dir` as the user data directory.
	pub fn args(&self, profile_dir: &Path) -> Vec<String> {
		let (width, height) = self.window_size;
		let mut args = vec![
			"--remote-debugging-port=0".to_string(),
			format!("--user-data-dir={}", profile_dir.display()),
			"--no-first-run".to_string(),
			"--no-default-browser-check".to_string(),
			"--disable-background-networking".to_string(),
			"--disable-extensions".to_string(),
			"--disable-sync".to_string(),
			"--mute-audio".to_string(),
			"--no-sandbox".to_string(),
			"--disable-setuid-sandbox".to_string(),
			format!("--window-size={width},{height}"),
		];

		if self.headless {
			args.push("--headless=new".to_string());
			args.push("--hide-scrollbars".to_string());
		}

		if self.ignore_https_errors {
			args.push("--ignore-certificate-errors".to_string());
		}

		args.extend(self.extra_args.iter().cloned());
		args.push("about:blank".to_string());
		args
	}
}

/// A running browser with remote debugging enabled.
#[derive(Debug)]
pub struct BrowserProcess {
	child: Child,
	ws_url: String,
	executable: PathBuf,
	/// Removed from disk when the process handle is dropped.
	_profile: TempDir,
}

impl BrowserProcess {
	/// Launches the browser and waits for its DevTools endpoint.
	///
	/// # Errors
	///
	/// Returns [`Error::BrowserNotFound`] when no executable can be located and
	/// [`Error::LaunchFailed`] when the process fails to start, exits early, or
	/// does not announce its endpoint within [`LaunchOptions::launch_timeout`].
	pub async fn launch(options: &LaunchOptions) -> Result<Self> {
		let executable = find_browser_executable(options.executable.as_deref())?;
		let profile = tempfile::Builder::new().prefix("dx-profile-").tempdir()?;
		let args = options.args(profile.path());

		debug!(target = "dx", executable = %executable.display(), ?args, "launching browser");

		let mut child = Command::new(&executable)
			.args(&args)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::piped())
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| Error::LaunchFailed(format!("failed to spawn {}: {e}", executable.display())))?;

		let stderr = child
			.stderr
			.take()
			.ok_or_else(|| Error::LaunchFailed("browser stderr was not captured".into()))?;
		let mut lines = BufReader::new(stderr).lines();

		let announced = tokio::time::timeout(options.launch_timeout, read_devtools_endpoint(&mut lines)).await;
		let ws_url = match announced {
			Ok(Ok(url)) => url,
			Ok(Err(e)) => {
				let _ = child.kill().await;
				return Err(e);
			}
			Err(_) => {
				let _ = child.kill().await;
				return Err(Error::LaunchFailed(format!(
					"DevTools endpoint not announced within {}ms",
					options.launch_timeout.as_millis()
				)));
			}
		};

		debug!(target = "dx", %ws_url, "browser ready");
		tokio::spawn(drain_stderr(lines));

		Ok(Self {
			child,
			ws_url,
			executable,
			_profile: profile,
		})
	}

	/// Browser-level DevTools WebSocket URL.
	pub fn ws_url(&self) -> &str {
		&self.ws_url
	}

	pub fn executable(&self) -> &Path {
		&self.executable
	}

	/// Waits for the process to exit after `Browser.close`, killing it if it lingers.
	pub async fn shutdown(mut self) -> Result<()> {
		match tokio::time::timeout(Duration::from_secs(5), self.child.wait()).await {
			Ok(Ok(status)) => {
				debug!(target = "dx", %status, "browser exited");
				Ok(())
			}
			Ok(Err(e)) => Err(Error::Io(e)),
			Err(_) => {
				warn!(target = "dx", "browser did not exit within 5s, killing");
				self.child.kill().await.map_err(Error::Io)
			}
		}
	}

	/// Force kill the browser process.
	pub async fn kill(mut self) -> Result<()> {
		self.child.kill().await.map_err(Error::Io)
	}
}

/// Extracts the WebSocket URL from a `DevTools listening on ws://...` stderr line.
pub fn parse_devtools_line(line: &str) -> Option<&str> {
	line.trim()
		.strip_prefix(DEVTOOLS_PREFIX)
		.map(str::trim)
		.filter(|url| url.starts_with("ws://") || url.starts_with("wss://"))
}

async fn read_devtools_endpoint<R>(lines: &mut Lines<R>) -> Result<String>
where
	R: AsyncBufRead + Unpin,
{
	let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

	while let Some(line) = lines.next_line().await? {
		if let Some(url) = parse_devtools_line(&line) {
			return Ok(url.to_string());
		}

		trace!(target = "dx", "browser: {line}");
		if tail.len() == STDERR_TAIL_LINES {
			tail.pop_front();
		}
		tail.push_back(line);
	}

	let tail: Vec<String> = tail.into();
	Err(Error::LaunchFailed(format!(
		"browser exited before announcing its DevTools endpoint: {}",
		tail.join(" | ")
	)))
}

async fn drain_stderr<R>(mut lines: Lines<R>)
where
	R: AsyncBufRead + Unpin,
{
	while let Ok(Some(line)) = lines.next_line().await {
		trace!(target = "dx", "browser: {line}");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn devtools_line_is_parsed() {
		let line = "DevTools listening on ws://127.0.0.1:40123/devtools/browser/6f1c";
		assert_eq!(parse_devtools_line(line), Some("ws://127.0.0.1:40123/devtools/browser/6f1c"));
	}

	#[test]
	fn unrelated_lines_are_ignored() {
		assert_eq!(parse_devtools_line("[0101/000000.000:ERROR:gpu_init.cc] oops"), None);
		assert_eq!(parse_devtools_line("DevTools listening on http://nope"), None);
	}

	#[test]
	fn headless_args_include_sandbox_and_tls_switches() {
		let args = LaunchOptions::default().args(Path::new("/tmp/profile"));
		assert_eq!(args.first().map(String::as_str), Some("--remote-debugging-port=0"));
		assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
		assert!(args.contains(&"--headless=new".to_string()));
		assert!(args.contains(&"--ignore-certificate-errors".to_string()));
		assert!(args.contains(&"--window-size=1920,1080".to_string()));
		assert_eq!(args.last().map(String::as_str), Some("about:blank"));
	}

	#[test]
	fn headed_launch_omits_headless_switches() {
		let opts = LaunchOptions {
			headless: false,
			ignore_https_errors: false,
			window_size: (800, 600),
			extra_args: vec!["--lang=en-US".into()],
			..LaunchOptions::default()
		};
		let args = opts.args(Path::new("/tmp/p"));
		assert!(!args.iter().any(|a| a.starts_with("--headless")));
		assert!(!args.contains(&"--ignore-certificate-errors".to_string()));
		assert!(args.contains(&"--window-size=800,600".to_string()));
		assert!(args.contains(&"--lang=en-US".to_string()));
	}

	#[tokio::test]
	async fn endpoint_found_after_noise() {
		let stderr: &[u8] = b"[WARNING] something\nDevTools listening on ws://127.0.0.1:9222/devtools/browser/x\nmore\n";
		let mut lines = BufReader::new(stderr).lines();
		let url = read_devtools_endpoint(&mut lines).await.unwrap();
		assert_eq!(url, "ws://127.0.0.1:9222/devtools/browser/x");
	}

	#[tokio::test]
	async fn early_exit_reports_stderr_tail() {
		let stderr: &[u8] = b"line1\nline2\nMissing X server or $DISPLAY\n";
		let mut lines = BufReader::new(stderr).lines();
		let err = read_devtools_endpoint(&mut lines).await.unwrap_err();
		match err {
			Error::LaunchFailed(msg) => {
				assert!(msg.contains("Missing X server"), "{msg}");
				assert!(msg.contains("line1"), "{msg}");
			}
			other => panic!("unexpected error: {other:?}"),
		}
	}
}

//! Browser executable discovery.
//!
//! Lookup order:
//! 1. Explicit path passed by the caller (`--chrome`)
//! 2. `CHROME_PATH` environment variable
//! 3. Well-known command names on `PATH`
//! 4. Well-known absolute install locations for the current platform

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Environment variable consulted when no explicit path is given.
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

const PATH_CANDIDATES: &[&str] = &[
	"google-chrome-stable",
	"google-chrome",
	"chromium",
	"chromium-browser",
	"chrome",
	"brave-browser",
	"brave",
	"microsoft-edge",
	"msedge",
];

#[cfg(target_os = "macos")]
const ABSOLUTE_CANDIDATES: &[&str] = &[
	"/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
	"/Applications/Chromium.app/Contents/MacOS/Chromium",
	"/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
	"/Applications/Google Chrome Canary.app/Contents/MacOS/Google Chrome Canary",
];

#[cfg(target_os = "windows")]
const ABSOLUTE_CANDIDATES: &[&str] = &[
	r"C:\Program Files\Google\Chrome\Application\chrome.exe",
	r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
	r"C:\Program Files\Chromium\Application\chrome.exe",
	r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const ABSOLUTE_CANDIDATES: &[&str] = &[
	"/usr/bin/google-chrome-stable",
	"/usr/bin/google-chrome",
	"/usr/bin/chromium",
	"/usr/bin/chromium-browser",
	"/snap/bin/chromium",
	"/opt/google/chrome/chrome",
];

/// Locates a Chromium-family browser executable.
///
/// # Errors
///
/// Returns [`Error::LaunchFailed`] if an explicit path (argument or `CHROME_PATH`)
/// does not exist, and [`Error::BrowserNotFound`] if nothing was discovered.
pub fn find_browser_executable(explicit: Option<&Path>) -> Result<PathBuf> {
	let env_override = std::env::var_os(CHROME_PATH_ENV)
		.filter(|v| !v.is_empty())
		.map(PathBuf::from);

	locate(explicit, env_override.as_deref(), |name| which::which(name).ok())
}

fn locate<F>(explicit: Option<&Path>, env_override: Option<&Path>, lookup: F) -> Result<PathBuf>
where
	F: Fn(&str) -> Option<PathBuf>,
{
	for (source, path) in [("argument", explicit), (CHROME_PATH_ENV, env_override)] {
		if let Some(path) = path {
			if path.exists() {
				debug!(target = "dx", source, path = %path.display(), "using configured browser");
				return Ok(path.to_path_buf());
			}
			return Err(Error::LaunchFailed(format!(
				"browser executable from {source} does not exist: {}",
				path.display()
			)));
		}
	}

	if let Some(path) = PATH_CANDIDATES.iter().find_map(|name| lookup(name)) {
		debug!(target = "dx", path = %path.display(), "found browser on PATH");
		return Ok(path);
	}

	ABSOLUTE_CANDIDATES
		.iter()
		.map(PathBuf::from)
		.find(|p| p.exists())
		.ok_or(Error::BrowserNotFound)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn explicit_path_wins_over_everything() {
		let exe = std::env::current_exe().unwrap();
		let found = locate(Some(&exe), Some(Path::new("/nonexistent/env-chrome")), |_| {
			Some(PathBuf::from("/usr/bin/from-path"))
		})
		.unwrap();
		assert_eq!(found, exe);
	}

	#[test]
	fn env_override_used_without_explicit_path() {
		let exe = std::env::current_exe().unwrap();
		let found = locate(None, Some(&exe), |_| None).unwrap();
		assert_eq!(found, exe);
	}

	#[test]
	fn missing_explicit_path_is_reported() {
		let err = locate(Some(Path::new("/definitely/not/here/chrome")), None, |_| None).unwrap_err();
		assert!(matches!(err, Error::LaunchFailed(msg) if msg.contains("/definitely/not/here/chrome")));
	}

	#[test]
	fn path_lookup_follows_candidate_order() {
		let found = locate(None, None, |name| match name {
			"chromium" => Some(PathBuf::from("/usr/local/bin/chromium")),
			"chrome" => Some(PathBuf::from("/usr/local/bin/chrome")),
			_ => None,
		})
		.unwrap();
		assert_eq!(found, PathBuf::from("/usr/local/bin/chromium"));
	}
}

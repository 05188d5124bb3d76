//! reveal.js deck configuration.
//!
//! [`DeckOptions`] is the option record handed to `Reveal.initialize`;
//! [`Hooks`] holds the independent cosmetic observers. Both are validated
//! before [`render_initializer`] emits the script, and every problem found is
//! reported at once.

mod hooks;
mod options;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::hooks::{Hooks, Observer, ReadyObserver, SlideChangeObserver, ThemeToggle};
pub use self::options::{ControlsLayout, DeckOptions, SlideNumber, Transition, TransitionSpeed};

/// One rejected setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckIssue {
	pub field: &'static str,
	pub message: String,
}

impl fmt::Display for DeckIssue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.field, self.message)
	}
}

#[derive(Debug, Error)]
pub enum DeckError {
	#[error("cannot read {}: {source}", path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid deck configuration: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("invalid deck configuration:\n{}", list(.0))]
	Invalid(Vec<DeckIssue>),
}

fn list(issues: &[DeckIssue]) -> String {
	issues
		.iter()
		.map(|issue| format!("  - {issue}"))
		.collect::<Vec<_>>()
		.join("\n")
}

/// Collects validation errors so they can be reported together.
#[derive(Debug, Default)]
pub struct Diagnostics {
	issues: Vec<DeckIssue>,
}

impl Diagnostics {
	pub fn error(&mut self, field: &'static str, message: impl Into<String>) {
		self.issues.push(DeckIssue {
			field,
			message: message.into(),
		});
	}

	pub fn into_result(self) -> Result<(), DeckError> {
		if self.issues.is_empty() {
			Ok(())
		} else {
			Err(DeckError::Invalid(self.issues))
		}
	}

	#[cfg(test)]
	pub(crate) fn fields(&self) -> Vec<&'static str> {
		self.issues.iter().map(|issue| issue.field).collect()
	}
}

impl DeckOptions {
	/// Checks value ranges: positive size, `0 <= margin < 1`,
	/// `0 < minScale <= maxScale`, `viewDistance >= 1`.
	pub fn validate(&self) -> Result<(), DeckError> {
		let mut diag = Diagnostics::default();
		self.check(&mut diag);
		diag.into_result()
	}
}

/// A deck configuration file: `{ "options": {...}, "hooks": {...} }`.
///
/// Both sections are optional and fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DeckConfig {
	pub options: DeckOptions,
	pub hooks: Hooks,
}

impl DeckConfig {
	/// Parses and validates a JSON configuration.
	pub fn from_json(text: &str) -> Result<Self, DeckError> {
		let config: Self = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and validates a configuration file.
	pub fn load(path: &Path) -> Result<Self, DeckError> {
		let text = std::fs::read_to_string(path).map_err(|source| DeckError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json(&text)
	}

	pub fn validate(&self) -> Result<(), DeckError> {
		let mut diag = Diagnostics::default();
		self.options.check(&mut diag);
		self.hooks.check(&mut diag);
		diag.into_result()
	}

	pub fn render(&self) -> Result<String, DeckError> {
		render_initializer(&self.options, &self.hooks)
	}
}

/// Renders `Reveal.initialize({...});` followed by one block per enabled observer.
pub fn render_initializer(options: &DeckOptions, hooks: &Hooks) -> Result<String, DeckError> {
	let mut diag = Diagnostics::default();
	options.check(&mut diag);
	hooks.check(&mut diag);
	diag.into_result()?;

	let record = serde_json::to_string_pretty(options)?;
	let mut script = format!("Reveal.initialize({record});\n");
	hooks.render_into(&mut script);
	Ok(script)
}

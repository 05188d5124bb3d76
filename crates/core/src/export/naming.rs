//! Output file naming.

use super::ExportError;

/// Deterministic `<prefix>-<workspace>-<key>.svg` naming.
///
/// The workspace segment mirrors how Structurizr Lite names its own exports;
/// a single-workspace server always uses `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
	pub prefix: String,
	pub workspace_id: u32,
}

impl OutputNaming {
	pub const DEFAULT_PREFIX: &'static str = "structurizr";
	pub const DEFAULT_WORKSPACE_ID: u32 = 1;

	pub fn new(prefix: impl Into<String>, workspace_id: u32) -> Self {
		Self {
			prefix: prefix.into(),
			workspace_id,
		}
	}

	/// File name for the view `key`.
	///
	/// # Errors
	///
	/// Returns [`ExportError::InvalidViewKey`] for keys that would not stay a
	/// single path component inside the output directory.
	pub fn file_name(&self, key: &str) -> Result<String, ExportError> {
		check_key(key)?;
		Ok(format!("{}-{}-{key}.svg", self.prefix, self.workspace_id))
	}
}

impl Default for OutputNaming {
	fn default() -> Self {
		Self::new(Self::DEFAULT_PREFIX, Self::DEFAULT_WORKSPACE_ID)
	}
}

fn check_key(key: &str) -> Result<(), ExportError> {
	let escapes = key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']);
	if escapes {
		return Err(ExportError::InvalidViewKey(key.to_string()));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_naming_matches_structurizr_lite() {
		let naming = OutputNaming::default();
		assert_eq!(naming.file_name("SystemContext").unwrap(), "structurizr-1-SystemContext.svg");
		assert_eq!(naming.file_name("Containers").unwrap(), "structurizr-1-Containers.svg");
	}

	#[test]
	fn naming_is_deterministic() {
		let naming = OutputNaming::default();
		assert_eq!(naming.file_name("Deployment-Live").unwrap(), naming.file_name("Deployment-Live").unwrap());
	}

	#[test]
	fn custom_prefix_and_workspace() {
		let naming = OutputNaming::new("acme", 42);
		assert_eq!(naming.file_name("Components").unwrap(), "acme-42-Components.svg");
	}

	#[test]
	fn keys_that_leave_the_directory_are_rejected() {
		let naming = OutputNaming::default();
		for key in ["", ".", "..", "../etc", "a/b", "a\\b"] {
			assert!(
				matches!(naming.file_name(key), Err(ExportError::InvalidViewKey(ref k)) if k == key),
				"key {key:?} should be rejected"
			);
		}
	}

	#[test]
	fn dots_and_spaces_inside_keys_are_kept() {
		let naming = OutputNaming::default();
		assert_eq!(naming.file_name("v1.2 Overview").unwrap(), "structurizr-1-v1.2 Overview.svg");
	}
}

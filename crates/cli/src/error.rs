use std::process::ExitCode;

use clap::error::ErrorKind;
use dx::deck::DeckError;
use dx::export::ExportError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	/// Rejected command line, or a `--help`/`--version` request.
	#[error(transparent)]
	Args(#[from] clap::Error),

	#[error(transparent)]
	Export(#[from] ExportError),

	#[error(transparent)]
	Deck(#[from] DeckError),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl CliError {
	/// Process exit status: `0` for help and version output, `1` for everything else.
	pub fn exit_code(&self) -> u8 {
		match self {
			Self::Args(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => 0,
			_ => 1,
		}
	}

	/// Prints the error to stderr and returns the matching exit status.
	///
	/// Argument errors are rendered by clap (message plus usage); anything else
	/// prints one `error:` line followed by its causes.
	pub fn report(&self) -> ExitCode {
		match self {
			Self::Args(err) => {
				let _ = err.print();
			}
			_ => eprintln!("{}", self.render()),
		}
		ExitCode::from(self.exit_code())
	}

	pub fn render(&self) -> String {
		let mut out = format!("error: {self}");
		let mut source = std::error::Error::source(self);
		while let Some(cause) = source {
			out.push_str(&format!("\n  caused by: {cause}"));
			source = cause.source();
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use clap::Parser;

	use super::*;
	use crate::cli::Cli;

	#[test]
	fn usage_errors_exit_one() {
		let err = CliError::from(Cli::try_parse_from(["export-diagrams"]).unwrap_err());
		assert_eq!(err.exit_code(), 1);
	}

	#[test]
	fn help_and_version_exit_zero() {
		let help = CliError::from(Cli::try_parse_from(["export-diagrams", "--help"]).unwrap_err());
		assert_eq!(help.exit_code(), 0);
		let version = CliError::from(Cli::try_parse_from(["export-diagrams", "--version"]).unwrap_err());
		assert_eq!(version.exit_code(), 0);
	}

	#[test]
	fn render_includes_cause_chain() {
		let err = CliError::from(ExportError::Io {
			path: PathBuf::from("/readonly/out"),
			source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
		});
		assert_eq!(err.exit_code(), 1);
		assert_eq!(
			err.render(),
			"error: cannot write /readonly/out: permission denied\n  caused by: permission denied"
		);
	}

	#[test]
	fn timeouts_render_as_single_line() {
		let err = CliError::from(ExportError::from(dx::Error::Timeout {
			ms: 30_000,
			condition: "diagram renderer ready".into(),
		}));
		assert_eq!(err.render(), "error: Timeout after 30000ms waiting for: diagram renderer ready");
	}
}

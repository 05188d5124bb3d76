use std::path::PathBuf;

use clap::Parser;
use dx::export::{ExportConfig, OutputNaming};
use dx::{LaunchOptions, SessionConfig, Viewport, WaitOptions};

use crate::styles::cli_styles;

#[derive(Parser, Debug)]
#[command(name = "export-diagrams")]
#[command(about = "Export every view of a Structurizr workspace to SVG through a headless browser")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Structurizr diagram viewer, e.g. http://localhost:8080/workspace/diagrams
	#[arg(value_name = "SOURCE_URL")]
	pub source_url: String,

	/// Directory the SVG files are written to (created if missing)
	#[arg(value_name = "OUTPUT_DIR")]
	pub output_dir: PathBuf,

	/// Bound for the page load and the first rendered diagram (0 = no bound)
	#[arg(long, value_name = "MS", default_value_t = 30_000)]
	pub timeout_ms: u64,

	/// Bound for each view to render after switching (0 = no bound)
	#[arg(long, value_name = "MS", default_value_t = 30_000)]
	pub render_timeout_ms: u64,

	/// Delay between two readiness checks
	#[arg(long, value_name = "MS", default_value_t = 100)]
	pub poll_interval_ms: u64,

	/// Viewport width in CSS pixels
	#[arg(long, value_name = "PX", default_value_t = 1920, value_parser = clap::value_parser!(u32).range(1..))]
	pub width: u32,

	/// Viewport height in CSS pixels
	#[arg(long, value_name = "PX", default_value_t = 1080, value_parser = clap::value_parser!(u32).range(1..))]
	pub height: u32,

	/// Browser executable (default: $CHROME_PATH, then PATH and well-known locations)
	#[arg(long, value_name = "PATH")]
	pub chrome: Option<PathBuf>,

	/// File name prefix
	#[arg(long, value_name = "PREFIX", default_value = OutputNaming::DEFAULT_PREFIX)]
	pub prefix: String,

	/// Workspace number in file names
	#[arg(long, value_name = "ID", default_value_t = OutputNaming::DEFAULT_WORKSPACE_ID)]
	pub workspace_id: u32,

	/// Export without the embedded Structurizr metadata
	#[arg(long)]
	pub no_metadata: bool,

	/// Show the browser window
	#[arg(long)]
	pub headed: bool,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Cli {
	pub fn session_config(&self) -> SessionConfig {
		SessionConfig {
			launch: LaunchOptions {
				executable: self.chrome.clone(),
				headless: !self.headed,
				window_size: (self.width, self.height),
				..LaunchOptions::default()
			},
			viewport: Viewport::new(self.width, self.height),
		}
	}

	pub fn export_config(&self) -> ExportConfig {
		ExportConfig {
			output_dir: self.output_dir.clone(),
			naming: OutputNaming::new(self.prefix.clone(), self.workspace_id),
			ready: WaitOptions::from_millis(self.timeout_ms, self.poll_interval_ms),
			render: WaitOptions::from_millis(self.render_timeout_ms, self.poll_interval_ms),
			include_metadata: !self.no_metadata,
		}
	}
}

/// `deck-config`: print the reveal.js initializer for a deck configuration.
#[derive(Parser, Debug)]
#[command(name = "deck-config")]
#[command(about = "Validate a reveal.js deck configuration and print its initializer script")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct DeckCli {
	/// JSON file with optional "options" and "hooks" sections (defaults when omitted)
	#[arg(value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, action = clap::ArgAction::Count)]
	pub verbose: u8,
}

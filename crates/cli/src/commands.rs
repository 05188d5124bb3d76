//! Command bodies behind the binaries.

use std::io::Write;

use anyhow::Context;
use dx::deck::DeckConfig;
use dx::export::{ExportEvent, ExportSummary, export_diagrams};
use tracing::info;

use crate::cli::{Cli, DeckCli};
use crate::error::Result;

/// Runs a full export, printing progress lines to stdout.
pub async fn export(cli: &Cli) -> Result<ExportSummary> {
	info!(target = "dx", url = %cli.source_url, output = %cli.output_dir.display(), "export requested");

	let summary = export_diagrams(&cli.session_config(), &cli.source_url, cli.export_config(), print_progress).await?;

	print_progress(&ExportEvent::Finished);
	Ok(summary)
}

pub fn print_progress(event: &ExportEvent) {
	println!("{event}");
}

/// Loads (or defaults) the deck configuration and renders its initializer.
pub fn deck(cli: &DeckCli) -> Result<String> {
	let config = match &cli.config {
		Some(path) => DeckConfig::load(path)?,
		None => DeckConfig::default(),
	};
	Ok(config.render()?)
}

/// Writes `script` to stdout.
pub fn emit(script: &str) -> Result<()> {
	let mut stdout = std::io::stdout().lock();
	stdout
		.write_all(script.as_bytes())
		.and_then(|()| stdout.flush())
		.context("writing initializer to stdout")?;
	Ok(())
}

use std::process::ExitCode;

use clap::Parser;
use dx_cli::cli::DeckCli;
use dx_cli::error::CliError;
use dx_cli::{commands, logging};

fn main() -> ExitCode {
	let cli = match DeckCli::try_parse() {
		Ok(cli) => cli,
		Err(err) => return CliError::from(err).report(),
	};
	logging::init_logging(cli.verbose);

	match commands::deck(&cli).and_then(|script| commands::emit(&script)) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => err.report(),
	}
}

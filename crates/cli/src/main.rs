use std::process::ExitCode;

use clap::Parser;
use dx_cli::cli::Cli;
use dx_cli::error::CliError;
use dx_cli::{commands, logging};

#[tokio::main]
async fn main() -> ExitCode {
	let cli = match Cli::try_parse() {
		Ok(cli) => cli,
		Err(err) => return CliError::from(err).report(),
	};
	logging::init_logging(cli.verbose);

	match commands::export(&cli).await {
		Ok(_) => ExitCode::SUCCESS,
		Err(err) => err.report(),
	}
}

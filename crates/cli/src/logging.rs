use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Installs the stderr subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

	// stdout carries progress lines, so logs stay on stderr
	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}

fn default_filter(verbosity: u8) -> &'static str {
	// 0 = warnings only
	// 1 (-v) = phase changes from the dx crates
	// 2+ (-vv) = protocol traffic and browser output
	match verbosity {
		0 => "warn",
		1 => "warn,dx=info,dx_runtime=info,dx_cli=info",
		2 => "debug",
		_ => "trace",
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_levels() {
		assert_eq!(default_filter(0), "warn");
		assert!(default_filter(1).contains("dx=info"));
		assert_eq!(default_filter(2), "debug");
		assert_eq!(default_filter(5), "trace");
		for level in 0..4 {
			EnvFilter::try_new(default_filter(level)).unwrap();
		}
	}
}

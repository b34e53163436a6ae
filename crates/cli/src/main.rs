//! Actionbook command-line front end.
//!
//! Loads every source tier once, pins the resulting snapshot and answers one query
//! against it. Load problems are logged to stderr; the exit status is non-zero only
//! when the requested item does not exist or the arguments are invalid.

mod cli;
mod output;

use std::process::ExitCode;

use actionbook_loader::FsLoader;
use clap::Parser;

use crate::cli::Cli;

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = cli.registry_config()?;
	let mut loader = FsLoader::new(config);
	if let Some(dir) = &cli.builtin {
		loader = loader.with_builtin_dir(dir);
	}

	let store = actionbook_loader::store(loader);
	let report = store.load();
	tracing::debug!(
		generation = report.generation,
		errors = report.errors.len(),
		"registry loaded"
	);

	let snapshot = store.snapshot();
	let reply = output::execute(&cli.command, &snapshot);
	let rendered = reply.render(cli.json);
	if cli.json {
		println!("{rendered}");
	} else if reply.is_found() {
		print!("{rendered}");
	} else {
		eprintln!("{rendered}");
	}

	Ok(if reply.is_found() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new(
				"actionbook=debug,actionbook_loader=debug,actionbook_registry=debug,warn",
			)
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

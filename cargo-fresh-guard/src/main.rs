//! CLI entrypoint for `cargo-fresh-guard`.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use fresh_defaults_guard::cli::{self, CargoCli};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = CargoCli::parse().into_args();
    match cli::run(&args, &mut io::stdout().lock()) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            writeln!(io::stderr().lock(), "error: {err}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

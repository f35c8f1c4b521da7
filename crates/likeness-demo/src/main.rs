#![forbid(unsafe_code)]

//! `likeness-demo`: render a bound schema to stdout.
//!
//! ```text
//! likeness-demo --root person --data ada.json --edit Grace --dump-model
//! ```
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `warn`).

mod app;
mod cli;
mod error;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match app::run(&cli) {
        Ok(output) => {
            println!("{}", output.html);
            if let Some(model) = output.model {
                match serde_json::to_string_pretty(&model) {
                    Ok(pretty) => println!("{pretty}"),
                    Err(err) => tracing::error!(error = %err, "failed to encode model"),
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "demo failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

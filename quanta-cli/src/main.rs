//! Quanta command line
//!
//! Answers one query given as arguments:
//!
//! ```text
//! quanta 4\'2-1/4\" in ft
//! ```
//!
//! Results are printed to stdout as `{"items": [...]}`; with
//! `DEBUG_CONVERTER` set they are dumped in debug form instead. Logs go to
//! stderr, filtered by `RUST_LOG`.

use quanta::{Converter, ResultItem, Settings};
use serde_json::json;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, Level};

fn log_level(settings: &Settings) -> Level {
    let default = if settings.debug { Level::DEBUG } else { Level::INFO };
    env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

fn main() -> ExitCode {
    let settings = Settings::from_env();

    tracing_subscriber::fmt()
        .with_max_level(log_level(&settings))
        .with_writer(std::io::stderr)
        .init();

    let query = env::args().skip(1).collect::<Vec<_>>().join(" ");
    let debug = settings.debug;

    let converter = match Converter::with_standard_registry(settings) {
        Ok(converter) => converter,
        Err(e) => {
            error!(error = %e, "failed to build unit registry");
            return ExitCode::FAILURE;
        }
    };
    info!(units = converter.registry().len(), query = %query, "answering query");

    let items: Vec<ResultItem> = converter.query(&query).collect();

    if debug {
        println!("{items:#?}");
        return ExitCode::SUCCESS;
    }

    match serde_json::to_string(&json!({ "items": items })) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to serialize results");
            ExitCode::FAILURE
        }
    }
}

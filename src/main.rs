mod cli;
mod config;
mod gateway;
mod highlight;
mod model;
mod notes;
mod sample;
mod storage;
mod tui;
mod workflow;

use std::process;

use tracing_subscriber::EnvFilter;

use config::{Config, forge_home};
use storage::Storage;

fn main() {
    init_tracing();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let Some(home) = forge_home() else {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    };

    let storage = match Storage::open(Storage::default_path(&home)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(&config, &storage) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Logs go to stderr, filtered by `FORGE_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FORGE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

mod cli;
mod commands;
mod error;
mod event;
mod fetch;
mod format;
mod logger;
mod record;
mod render;
mod storage;

use clap::Parser;
use cli::{Cli, Command};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init { target, dir } => commands::init::run(&cli.config, target, dir),
        Command::Ingest => commands::ingest::run(&cli.config),
        Command::Render => commands::render::run(&cli.config),
        Command::History { last, json } => commands::history::run(&cli.config, last, json),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dm-transcript", about = "Plain-text and HTML transcripts of direct messages")]
pub struct Cli {
    /// Path to config.toml
    #[arg(
        long,
        global = true,
        env = "DM_TRANSCRIPT_CONFIG",
        default_value = "dm-transcript.toml"
    )]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the storage directory and write a default config
    Init {
        /// User id whose direct messages are logged
        #[arg(long)]
        target: u64,
        /// Directory holding messages.txt, messages.html and media
        #[arg(long, default_value = "transcripts")]
        dir: PathBuf,
    },

    /// Log incoming message events (one JSON object per stdin line, until EOF)
    Ingest,

    /// Regenerate messages.html from messages.txt
    Render,

    /// Print the logged history
    History {
        /// Only show the last N messages
        #[arg(long)]
        last: Option<usize>,
        /// Print one JSON object per message
        #[arg(long)]
        json: bool,
    },
}

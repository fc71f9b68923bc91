use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mediashelf")]
#[command(author, version, about = "Media library browser with metadata enrichment")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Start {
        /// Host to bind to (overrides `server.host`)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides `server.port`)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print one enriched directory listing as JSON
    List {
        /// Library index, as listed in the config file
        library: usize,

        /// Path relative to the library root
        path: Option<String>,

        /// Include entries whose name starts with a dot
        #[arg(long)]
        hidden: bool,

        /// Page number, starting at 1 (background mode only)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,

        /// Entries per page; values below 1 use the configured default
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        size: i64,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::BackendKind;

#[derive(Parser, Debug)]
#[command(name = "terabox-bot")]
#[command(author, version, about = "Telegram bot that turns TeraBox share links into direct download links", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured extraction backend
    #[arg(short, long, global = true, value_enum)]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot and the keep-alive server
    Run,

    /// Resolve one share link and print the result
    Resolve {
        /// Share link to resolve
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate the download time for a size label such as "12.4 MB"
    Estimate {
        /// Size label
        size: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

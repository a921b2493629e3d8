use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod network;
pub mod signer;

pub use network::NetworkCliArgs;
pub use signer::SignerCliArgs;

#[derive(Parser, Debug)]
#[command(
    name = "restaker",
    version,
    about = "Restaker - compounds staking rewards and keeps escrow locks at their target",
    after_help = "Examples:\n  \
    restaker run --dry-run\n  \
    restaker daemon --interval-hours 24\n  \
    restaker status --mode lock-extend\n  \
    restaker history --limit 10"
)]
pub struct Cli {
    /// Path to the YAML configuration file.
    #[arg(env = "RESTAKER_CONFIG", long = "config", global = true, default_value = "config.yaml")]
    pub config_file: PathBuf,

    #[command(flatten)]
    pub network_args: NetworkCliArgs,

    #[command(flatten)]
    pub signer_args: SignerCliArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single maintenance pass and exit
    Run {
        /// Estimate and log the sequence without signing or broadcasting anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Run a pass now and then on a fixed interval until interrupted
    Daemon {
        #[arg(env = "RESTAKER_INTERVAL_HOURS", long, default_value_t = 24)]
        interval_hours: u64,

        #[arg(long)]
        dry_run: bool,
    },
    /// Show the current on-chain position and what the next pass would do
    Status,
    /// Summarise the recorded history
    History {
        /// Number of recent rows to print.
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

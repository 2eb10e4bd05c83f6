use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "deploy/dynprice.yaml";

#[derive(Parser, Debug)]
#[command(name = "dynprice")]
#[command(about = "dynprice - day-ahead energy price tracker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download prices on a schedule and keep the series current
    Run {
        /// Path to the configuration file
        #[arg(short, long, env = "DYNPRICE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Ingest a quote file once and print the resulting snapshot as JSON
    Snapshot {
        /// Path to the configuration file
        #[arg(short, long, env = "DYNPRICE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// JSON array of `{"dateTime", "price"}` records
        #[arg(short, long)]
        quotes: PathBuf,

        /// Evaluate at this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<String>,
    },

    /// Validate configuration without starting
    Validate {
        /// Path to the configuration file
        #[arg(short, long, env = "DYNPRICE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "dynprice.yaml")]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

//! `attesta start` — Start the Attesta node.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Path to the config file.
    #[arg(short, long, default_value = "attesta.toml")]
    pub config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Override the log level.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn run(args: &StartArgs) -> anyhow::Result<()> {
    println!("Starting Attesta node...");
    println!("  Config: {}", args.config.display());
    if let Some(port) = args.api_port {
        println!("  API port override: {}", port);
    }
    if let Some(ref level) = args.log_level {
        println!("  Log level: {}", level);
    }

    println!();
    println!("Hint: Use the attesta-node binary for a full node:");
    println!("  attesta-node --config {}", args.config.display());

    Ok(())
}

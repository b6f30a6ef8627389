//! `attesta init` — Write a starter node configuration.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path for the config file.
    #[arg(short, long, default_value = "attesta.toml")]
    pub config: PathBuf,

    /// The owner principal, fixed at system creation.
    #[arg(long)]
    pub owner: String,

    /// Overwrite an existing config file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    if args.config.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.config.display()
        );
    }

    let contents = format!(
        r#"[api]
listen_addr = "127.0.0.1"
port = 7401

[storage]
data_dir = "./data"

[logging]
level = "info"
format = "text"

[registry]
owner = "{}"
"#,
        args.owner
    );

    if let Some(parent) = args.config.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.config, contents)?;

    println!("Wrote config to {}", args.config.display());
    println!("  Owner: {}", args.owner);
    println!();
    println!("Start the node with: attesta-node --config {}", args.config.display());

    Ok(())
}

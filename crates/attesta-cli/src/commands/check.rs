//! `attesta check` — Check the lifecycle status of a commitment.

use clap::Args;
use serde::Deserialize;

use crate::commands::common::CommitmentArgs;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,

    #[command(flatten)]
    pub commitment: CommitmentArgs,
}

#[derive(Deserialize)]
struct StatusView {
    registered: bool,
    verified: bool,
    revoked: bool,
    revoked_at: Option<String>,
    revocation_reason: Option<String>,
}

pub async fn run(args: &CheckArgs) -> anyhow::Result<()> {
    let commitment = args.commitment.resolve()?;
    if args.commitment.is_derived() {
        println!("Computed commitment: {}", commitment);
    }

    let url = format!("{}/api/v1/identities/{}", args.endpoint, commitment.to_hex());
    let resp = reqwest::get(&url).await?;
    if !resp.status().is_success() {
        anyhow::bail!("node returned HTTP {}", resp.status());
    }
    let view: StatusView = resp.json().await?;

    println!("Status of {}:", commitment);
    println!("  Registered:  {}", view.registered);
    println!("  Verified:    {}", view.verified);
    println!("  Revoked:     {}", view.revoked);
    if let Some(at) = view.revoked_at {
        println!("  Revoked at:  {}", at);
    }
    if let Some(reason) = view.revocation_reason {
        if reason.is_empty() {
            println!("  Reason:      (none given)");
        } else {
            println!("  Reason:      {}", reason);
        }
    }

    Ok(())
}

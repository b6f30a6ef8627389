//! `attesta verify` — Confirm a registered commitment (verifiers only).

use clap::Args;

use crate::commands::common::{post_mutation, CommitmentArgs};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,

    /// The verifier principal.
    #[arg(long)]
    pub caller: String,

    #[command(flatten)]
    pub commitment: CommitmentArgs,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let commitment = args.commitment.resolve()?;
    let body = serde_json::json!({
        "caller": args.caller,
        "commitment": commitment.to_string(),
    });
    let resp = post_mutation(&args.endpoint, "/api/v1/identities/verify", body).await?;

    println!("Verified {}", commitment);
    println!("  Verifier:   {}", args.caller);
    println!("  Audit seq:  {}", resp.seq);

    Ok(())
}

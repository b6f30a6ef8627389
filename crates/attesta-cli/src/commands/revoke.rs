//! `attesta revoke` — Revoke a registered or verified commitment.

use clap::Args;

use crate::commands::common::{post_mutation, CommitmentArgs};

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,

    /// The verifier principal.
    #[arg(long)]
    pub caller: String,

    /// Reason for the revocation, preserved verbatim in the audit log.
    #[arg(long, default_value = "")]
    pub reason: String,

    #[command(flatten)]
    pub commitment: CommitmentArgs,
}

pub async fn run(args: &RevokeArgs) -> anyhow::Result<()> {
    let commitment = args.commitment.resolve()?;
    let body = serde_json::json!({
        "caller": args.caller,
        "commitment": commitment.to_string(),
        "reason": args.reason,
    });
    let resp = post_mutation(&args.endpoint, "/api/v1/identities/revoke", body).await?;

    println!("Revoked {}", commitment);
    println!("  Verifier:   {}", args.caller);
    if args.reason.is_empty() {
        println!("  Reason:     (none given)");
    } else {
        println!("  Reason:     {}", args.reason);
    }
    println!("  Audit seq:  {}", resp.seq);

    Ok(())
}

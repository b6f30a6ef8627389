//! `attesta register` — Register an identity commitment.

use clap::Args;

use crate::commands::common::{post_mutation, CommitmentArgs};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,

    /// The principal registering the commitment.
    #[arg(long)]
    pub caller: String,

    #[command(flatten)]
    pub commitment: CommitmentArgs,
}

pub async fn run(args: &RegisterArgs) -> anyhow::Result<()> {
    let commitment = args.commitment.resolve()?;
    if args.commitment.is_derived() {
        println!("Computed commitment: {}", commitment);
    }

    let body = serde_json::json!({
        "caller": args.caller,
        "commitment": commitment.to_string(),
    });
    let resp = post_mutation(&args.endpoint, "/api/v1/identities/register", body).await?;

    println!("Registered {}", commitment);
    println!("  Caller:     {}", args.caller);
    println!("  Audit seq:  {}", resp.seq);

    Ok(())
}

//! `attesta add-verifier` — Grant the verifier capability (owner only).

use clap::Args;

use crate::commands::common::post_mutation;

#[derive(Args, Debug)]
pub struct AddVerifierArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,

    /// The calling principal (must be the owner).
    #[arg(long)]
    pub caller: String,

    /// The principal to grant the verifier capability to.
    #[arg(long)]
    pub target: String,
}

pub async fn run(args: &AddVerifierArgs) -> anyhow::Result<()> {
    let body = serde_json::json!({
        "caller": args.caller,
        "target": args.target,
    });
    let resp = post_mutation(&args.endpoint, "/api/v1/verifiers/add", body).await?;

    println!("Added verifier {}", args.target);
    println!("  Audit seq:  {}", resp.seq);

    Ok(())
}

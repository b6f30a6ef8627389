//! `attesta verifiers` — List the current verifier set.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct VerifiersArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct VerifiersResponse {
    owner: String,
    verifiers: Vec<String>,
    count: usize,
}

pub async fn run(args: &VerifiersArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/verifiers", args.endpoint);
    let resp = reqwest::get(&url).await?;
    if !resp.status().is_success() {
        anyhow::bail!("node returned HTTP {}", resp.status());
    }
    let list: VerifiersResponse = resp.json().await?;

    println!("Owner: {} (always a verifier)", list.owner);
    if list.verifiers.is_empty() {
        println!("No additional verifiers.");
    } else {
        println!("Verifiers ({}):", list.count);
        for v in &list.verifiers {
            println!("  {}", v);
        }
    }

    Ok(())
}

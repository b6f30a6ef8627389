//! `attesta status` — Query the status of a running Attesta node.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    owner: String,
    identities: usize,
    verifiers: usize,
    audit_entries: usize,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/status", args.endpoint);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let status: StatusResponse = r.json().await?;
            println!("Node Status:");
            println!("  Version:        {}", status.version);
            println!("  Owner:          {}", status.owner);
            println!("  Identities:     {}", status.identities);
            println!("  Verifiers:      {}", status.verifiers);
            println!("  Audit entries:  {}", status.audit_entries);
            println!("  Uptime:         {}s", status.uptime_secs);
        }
        Ok(r) => {
            anyhow::bail!("node returned HTTP {}", r.status());
        }
        Err(e) => {
            println!("Could not reach node at {}", args.endpoint);
            println!("  Error: {}", e);
            println!();
            println!("Is the node running? Start it with: attesta-node");
        }
    }

    Ok(())
}

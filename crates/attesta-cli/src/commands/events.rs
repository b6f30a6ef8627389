//! `attesta events` — Fetch the replayable audit event feed.

use clap::Args;
use serde::Deserialize;

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:7401")]
    pub endpoint: String,

    /// Only entries after this sequence number.
    #[arg(long)]
    pub after: Option<u64>,
}

#[derive(Deserialize)]
struct EventsResponse {
    entries: Vec<serde_json::Value>,
    count: usize,
}

pub async fn run(args: &EventsArgs) -> anyhow::Result<()> {
    let mut url = format!("{}/api/v1/events", args.endpoint);
    if let Some(after) = args.after {
        url.push_str(&format!("?after={after}"));
    }

    let resp = reqwest::get(&url).await?;
    if !resp.status().is_success() {
        anyhow::bail!("node returned HTTP {}", resp.status());
    }
    let feed: EventsResponse = resp.json().await?;

    if feed.entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }

    println!("Audit entries ({}):", feed.count);
    for entry in &feed.entries {
        println!("  {}", serde_json::to_string(entry)?);
    }

    Ok(())
}

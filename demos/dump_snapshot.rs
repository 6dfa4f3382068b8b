// Fetch the current snapshot from a running instance and pretty-print it.
//
// Usage: cargo run --example dump_snapshot -- [BASE_URL]
//   BASE_URL  default: http://127.0.0.1:8081

use std::env;

use svclens::models::Snapshot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let base_url = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("http://127.0.0.1:8081");

    let snapshot: Snapshot = reqwest::get(format!("{base_url}/api/snapshot"))
        .await?
        .error_for_status()?
        .json()
        .await?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

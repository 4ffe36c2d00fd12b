//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! Reads trope identification requests as newline-delimited JSON from
//! stdin and writes one JSON response per line to stdout.
//!
//! Usage: `librarian-host [--config PATH]`
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use std::path::PathBuf;

use librarian::host::stdio::run_stdio_bridge;
use librarian::{LibrarianConfig, TropeAgent};

const USAGE: &str = "usage: librarian-host [--config PATH]";

fn config_path_from_args() -> anyhow::Result<Option<PathBuf>> {
    let mut args = std::env::args().skip(1);
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config needs a path\n{USAGE}"))?;
                path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                eprintln!("{USAGE}");
                std::process::exit(0);
            }
            other => anyhow::bail!("unexpected argument: {other}\n{USAGE}"),
        }
    }
    Ok(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("librarian=info,trope_fusion=info")
            }),
        )
        .init();

    let config_path = config_path_from_args()?;
    let config = LibrarianConfig::load(config_path.as_deref())
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
    let agent = TropeAgent::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to start trope agent: {e}"))?;

    tracing::info!("librarian-host starting");

    run_stdio_bridge(&agent).await.map_err(|e| {
        tracing::error!(error = %e, "librarian-host exited with error");
        anyhow::anyhow!("librarian-host failed: {e}")
    })?;

    tracing::info!("librarian-host shut down cleanly");
    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use pwget::{Args, Coordinator, Settings, logging};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("{}: logging disabled: {}", pwget::error::PROGRAM, e);
    }

    let coordinator =
        Coordinator::new(Settings::default()).context("Failed to build HTTP client")?;

    let (outcome, _) = coordinator.run(&args.urls, std::io::stdout()).await;

    info!(
        succeeded = outcome.succeeded().await,
        failed = outcome.failed().await,
        rejected = outcome.rejected.len(),
        "batch complete"
    );

    Ok(())
}

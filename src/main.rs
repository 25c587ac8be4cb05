use anyhow::Result;
use clap::Parser;
use tracing::info;

use ballotsmith::{server, telemetry, BallotSmith, BaseConfig};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();
    info!("Starting ballotsmith");

    let config = BaseConfig::parse();
    info!(
        "Configuration: listen_addr={}, directory_url={}, concurrency={}",
        config.listen_addr, config.directory_url, config.concurrency
    );

    let listen_addr = config.listen_addr.clone();
    let app = BallotSmith::initialize(config)?;
    server::serve(app, &listen_addr).await?;

    info!("ballotsmith shutdown complete");
    Ok(())
}

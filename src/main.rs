use bridge_networks::utils::logging::init_logging;
use bridge_networks::{start_app, AppArgs};
use clap::Parser;
use eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = AppArgs::parse();

    init_logging(&args.log_level)?;

    start_app(args).await
}

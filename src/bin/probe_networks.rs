use std::path::PathBuf;
use std::time::Duration;

use bridge_networks::services::loader::ConfigLoader;
use bridge_networks::services::probe::{probe_all, probe_network};
use bridge_networks::utils::config::DEFAULT_ENV_FILE;
use bridge_networks::utils::logging::init_logging;
use clap::Parser;
use eyre::{eyre, Result};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "Bridge network RPC probe")]
struct Args {
    /// Only probe this network
    network: Option<String>,

    /// Env file read for variables missing from the process environment
    #[clap(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Per-endpoint timeout in seconds
    #[clap(short, long, default_value = "10")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line args
    let args = Args::parse();

    init_logging("info")?;

    let loader = ConfigLoader::from_env_file(&args.env_file);
    let timeout = Duration::from_secs(args.timeout_secs);

    let redactor = loader.redactor();

    let reports = match args.network {
        Some(name) => vec![probe_network(&loader.resolve_network(&name)?, timeout, &redactor).await],
        None => probe_all(&loader.load(), timeout, &redactor).await,
    };
    println!("{}", serde_json::to_string_pretty(&reports)?);

    let failed = reports.iter().filter(|report| !report.is_ok()).count();
    if failed > 0 {
        return Err(eyre!("{} of {} endpoints failed", failed, reports.len()));
    }
    Ok(())
}

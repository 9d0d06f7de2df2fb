pub mod models;
pub mod services;
pub mod utils;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing::{info, warn};

use models::{Accounts, Configuration};
use services::loader::{init_global, ConfigLoader};
use services::probe::{probe_all, probe_network};
use utils::config::DEFAULT_ENV_FILE;
use utils::env::{EnvProvider, Redactor};
use utils::ethereum::signer_address;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Network configuration for the standard bridge toolchain")]
pub struct AppArgs {
    /// Env file read for variables missing from the process environment
    #[clap(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Log level used when RUST_LOG is not set
    #[clap(long, default_value = "info")]
    pub log_level: String,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the resolved configuration as JSON (default)
    Show {
        /// Print private keys instead of redacting them
        #[clap(long)]
        reveal_secrets: bool,

        /// Single-line output
        #[clap(long)]
        compact: bool,
    },
    /// List network profiles
    Networks,
    /// Verify a network can sign transactions
    Check {
        network: String,
    },
    /// Query RPC endpoints for chain id and latest block
    Probe {
        /// Only probe this network
        network: Option<String>,

        #[clap(long, default_value = "10")]
        timeout_secs: u64,
    },
}

impl Command {
    fn or_default(command: Option<Command>) -> Command {
        command.unwrap_or(Command::Show { reveal_secrets: false, compact: false })
    }
}

/// Loads the configuration and runs the requested command
pub async fn start_app(args: AppArgs) -> Result<()> {
    let loader = ConfigLoader::from_env_file(&args.env_file);
    let unset = loader.unset_variables();
    if !unset.is_empty() {
        info!(variables = ?unset, "some environment variables are unset");
    }
    let config = init_global(loader.load());
    let redactor = loader.redactor();

    match Command::or_default(args.command) {
        Command::Show { reveal_secrets, compact } => {
            println!("{}", render_config(config, &redactor, reveal_secrets, compact)?);
        }
        Command::Networks => {
            for line in render_networks(&loader, config) {
                println!("{}", line);
            }
        }
        Command::Check { network } => {
            for line in check_network(config, &network)? {
                println!("{}", line);
            }
        }
        Command::Probe { network, timeout_secs } => {
            let timeout = Duration::from_secs(timeout_secs);
            let reports = match network {
                Some(name) => {
                    vec![probe_network(config.require_network(&name)?, timeout, &redactor).await]
                }
                None => probe_all(config, timeout, &redactor).await,
            };
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    Ok(())
}

fn render_config(
    config: &Configuration,
    redactor: &Redactor,
    reveal_secrets: bool,
    compact: bool,
) -> Result<String> {
    let shown = if reveal_secrets { config.clone() } else { config.redacted(redactor) };
    Ok(shown.to_json(!compact)?)
}

/// One line per profile. Endpoints are printed as templates so secrets stay
/// `${VAR}` references.
fn render_networks<E: EnvProvider>(loader: &ConfigLoader<E>, config: &Configuration) -> Vec<String> {
    loader
        .templates()
        .iter()
        .map(|template| {
            let endpoint = template
                .url
                .as_ref()
                .map(|url| url.to_string())
                .unwrap_or_else(|| "<in-process>".to_string());

            let accounts = config.network(&template.name).map(|profile| &profile.accounts);
            let signer = match accounts {
                Some(Accounts::PrivateKeys(keys)) => keys
                    .first()
                    .and_then(|key| signer_address(key).ok())
                    .map(|address| format!("{:?}", address))
                    .unwrap_or_else(|| "<no usable key>".to_string()),
                Some(Accounts::Mnemonic { .. }) => "<mnemonic>".to_string(),
                None => String::new(),
            };
            let kind = accounts.map(Accounts::kind).unwrap_or_default();

            format!("{:<26} {:<60} {:<13} {}", template.name, endpoint, kind, signer)
        })
        .collect()
}

/// Fails unless `network` has usable signing keys
fn check_network(config: &Configuration, network: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for key in config.signing_keys(network)? {
        lines.push(format!("{} signer: {:?}", network, signer_address(key)?));
    }
    match config.rpc_url(network) {
        Ok(_) => lines.push(format!("{} ready", network)),
        Err(e) => warn!(error = %e, "network has keys but no endpoint"),
    }
    Ok(lines)
}

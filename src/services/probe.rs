use std::time::Duration;

use eyre::{eyre, Result};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};
use web3::transports::Http;
use web3::Web3;

use crate::models::{Configuration, NetworkProfile};
use crate::utils::env::Redactor;

/// Outcome of querying one network's RPC endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_block: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

async fn query_endpoint(url: &str) -> Result<(u64, u64)> {
    let transport = Http::new(url)?;
    let web3 = Web3::new(transport);

    let chain_id = web3.eth().chain_id().await?;
    let latest_block = web3.eth().block_number().await?;

    Ok((chain_id.low_u64(), latest_block.as_u64()))
}

/// Queries chain id and latest block. Failures end up in the report with
/// every secret known to `redactor` scrubbed, since transport errors quote
/// the request URL.
pub async fn probe_network(
    profile: &NetworkProfile,
    timeout: Duration,
    redactor: &Redactor,
) -> ProbeReport {
    let mut report = ProbeReport {
        network: profile.name.clone(),
        chain_id: None,
        latest_block: None,
        error: None,
    };

    let result = match profile.url.as_deref() {
        None => Err(eyre!("in-process network has no RPC endpoint")),
        Some(url) => match tokio::time::timeout(timeout, query_endpoint(url)).await {
            Ok(result) => result,
            Err(_) => Err(eyre!("timed out after {:?}", timeout)),
        },
    };

    match result {
        Ok((chain_id, latest_block)) => {
            info!(network = %profile.name, chain_id, latest_block, "endpoint reachable");
            report.chain_id = Some(chain_id);
            report.latest_block = Some(latest_block);
        }
        Err(e) => {
            let error = redactor.scrub(&e.to_string());
            warn!(network = %profile.name, error = %error, "endpoint probe failed");
            report.error = Some(error);
        }
    }

    report
}

/// Probes every profile that has an endpoint concurrently. Reports come
/// back in name order.
pub async fn probe_all(
    config: &Configuration,
    timeout: Duration,
    redactor: &Redactor,
) -> Vec<ProbeReport> {
    join_all(
        config
            .networks
            .values()
            .filter(|profile| !profile.is_in_process())
            .map(|profile| probe_network(profile, timeout, redactor)),
    )
    .await
}

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::network::{Accounts, NetworkProfile};
use crate::utils::env::Redactor;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Network '{0}' runs in-process and has no RPC endpoint")]
    NoRpcEndpoint(String),

    #[error("Network '{0}' uses mnemonic accounts, not private keys")]
    MnemonicAccounts(String),

    #[error("Network '{network}' has an empty private key at index {index}; is PRIVATE_KEY set?")]
    EmptyPrivateKey { network: String, index: usize },
}

/// Contract compiler release to invoke
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompilerSetting {
    pub version: String,
}

/// Root configuration handed to the external build tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub networks: BTreeMap<String, NetworkProfile>,
    pub solidity: CompilerSetting,
}

impl Configuration {
    pub fn network(&self, name: &str) -> Option<&NetworkProfile> {
        self.networks.get(name)
    }

    pub fn require_network(&self, name: &str) -> Result<&NetworkProfile, ConfigError> {
        self.network(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn rpc_url(&self, name: &str) -> Result<&str, ConfigError> {
        self.require_network(name)?
            .url
            .as_deref()
            .ok_or_else(|| ConfigError::NoRpcEndpoint(name.to_string()))
    }

    /// Keys for signing on `name`.
    ///
    /// Loading tolerates empty keys; this is where they get rejected.
    pub fn signing_keys(&self, name: &str) -> Result<&[String], ConfigError> {
        let profile = self.require_network(name)?;
        let keys = match &profile.accounts {
            Accounts::PrivateKeys(keys) => keys,
            Accounts::Mnemonic { .. } => return Err(ConfigError::MnemonicAccounts(name.to_string())),
        };

        if let Some(index) = keys.iter().position(|key| key.is_empty()) {
            return Err(ConfigError::EmptyPrivateKey {
                network: name.to_string(),
                index,
            });
        }

        Ok(keys.as_slice())
    }

    /// Copy with private keys masked and every value known to `redactor`
    /// scrubbed from the endpoints
    pub fn redacted(&self, redactor: &Redactor) -> Self {
        Self {
            networks: self
                .networks
                .iter()
                .map(|(name, profile)| (name.clone(), profile.redacted(redactor)))
                .collect(),
            solidity: self.solidity.clone(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

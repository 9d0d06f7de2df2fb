use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::models::{Accounts, CompilerSetting, ConfigError, Configuration, NetworkProfile};
use crate::utils::config::{accounts, compiler, networks};
use crate::utils::env::{DotenvEnv, EnvProvider, EnvTemplate, ProcessEnv, Redactor};

/// Account material before environment resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountsTemplate {
    Mnemonic(String),
    PrivateKeys(Vec<EnvTemplate>),
}

/// A network profile whose secrets are still variable references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTemplate {
    pub name: String,
    pub url: Option<EnvTemplate>,
    pub accounts: AccountsTemplate,
}

impl NetworkTemplate {
    pub fn resolve<E: EnvProvider + ?Sized>(&self, env: &E) -> NetworkProfile {
        let accounts = match &self.accounts {
            AccountsTemplate::Mnemonic(phrase) => Accounts::Mnemonic {
                mnemonic: phrase.clone(),
            },
            AccountsTemplate::PrivateKeys(keys) => {
                Accounts::PrivateKeys(keys.iter().map(|key| key.resolve(env)).collect())
            }
        };

        NetworkProfile {
            name: self.name.clone(),
            url: self.url.as_ref().map(|url| url.resolve(env)),
            accounts,
        }
    }

    /// Every environment variable this profile reads
    pub fn variables(&self) -> Vec<&str> {
        let mut vars: Vec<&str> = self.url.iter().flat_map(EnvTemplate::variables).collect();
        if let AccountsTemplate::PrivateKeys(keys) = &self.accounts {
            vars.extend(keys.iter().flat_map(EnvTemplate::variables));
        }
        vars
    }
}

/// The bridge project's network table
pub fn default_networks() -> Vec<NetworkTemplate> {
    let mnemonic = || AccountsTemplate::Mnemonic(accounts::TEST_MNEMONIC.to_string());
    let private_key = || AccountsTemplate::PrivateKeys(vec![EnvTemplate::var(accounts::PRIVATE_KEY_VAR)]);

    vec![
        NetworkTemplate {
            name: networks::HARDHAT.to_string(),
            url: None,
            accounts: mnemonic(),
        },
        NetworkTemplate {
            name: networks::OPTIMISM.to_string(),
            url: Some(EnvTemplate::literal(networks::OPTIMISM_URL)),
            accounts: mnemonic(),
        },
        NetworkTemplate {
            name: networks::GOERLI.to_string(),
            url: Some(
                EnvTemplate::literal(networks::GOERLI_ALCHEMY_URL)
                    .then_var(accounts::ALCHEMY_API_KEY_VAR),
            ),
            accounts: private_key(),
        },
        NetworkTemplate {
            name: networks::TOKAMAK_OPTIMISM_GOERLI.to_string(),
            url: Some(EnvTemplate::literal(networks::TOKAMAK_OPTIMISM_GOERLI_URL)),
            accounts: private_key(),
        },
    ]
}

/// Builds the [`Configuration`] from the network table and an environment
pub struct ConfigLoader<E> {
    env: E,
    networks: Vec<NetworkTemplate>,
    solidity: String,
}

impl<E: EnvProvider> ConfigLoader<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            networks: default_networks(),
            solidity: compiler::SOLIDITY_VERSION.to_string(),
        }
    }

    pub fn templates(&self) -> &[NetworkTemplate] {
        &self.networks
    }

    /// Resolves every profile against the current environment.
    ///
    /// Never fails: unset variables become empty strings.
    pub fn load(&self) -> Configuration {
        let networks: BTreeMap<String, NetworkProfile> = self
            .networks
            .iter()
            .map(|template| {
                let profile = template.resolve(&self.env);
                debug!(
                    network = %profile.name,
                    in_process = profile.is_in_process(),
                    accounts = profile.accounts.kind(),
                    "resolved network profile"
                );
                (profile.name.clone(), profile)
            })
            .collect();

        Configuration {
            networks,
            solidity: CompilerSetting {
                version: self.solidity.clone(),
            },
        }
    }

    /// Resolves only `name`, reading the environment at the point of use
    pub fn resolve_network(&self, name: &str) -> Result<NetworkProfile, ConfigError> {
        self.networks
            .iter()
            .find(|template| template.name == name)
            .map(|template| template.resolve(&self.env))
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    /// Scrubs the current value of every variable the table references.
    /// Every such variable carries a secret: an API key or a private key.
    pub fn redactor(&self) -> Redactor {
        Redactor::new(
            self.networks
                .iter()
                .flat_map(NetworkTemplate::variables)
                .filter_map(|var| self.env.var(var)),
        )
    }

    /// Referenced variables the environment leaves unset, deduplicated
    pub fn unset_variables(&self) -> Vec<&str> {
        let mut unset: Vec<&str> = Vec::new();
        for var in self.networks.iter().flat_map(NetworkTemplate::variables) {
            if !unset.contains(&var) && self.env.var(var).map_or(true, |v| v.is_empty()) {
                unset.push(var);
            }
        }
        unset
    }
}

impl ConfigLoader<DotenvEnv<ProcessEnv>> {
    /// Process environment with `path` as a non-overriding fallback
    pub fn from_env_file<P: AsRef<Path>>(path: P) -> Self {
        Self::new(DotenvEnv::load(ProcessEnv, path))
    }
}

static CONFIG: OnceCell<Configuration> = OnceCell::new();

/// Installs the process-wide configuration. Only the first call takes
/// effect; later calls get the already installed value back.
pub fn init_global(config: Configuration) -> &'static Configuration {
    CONFIG.get_or_init(|| config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::env::MapEnv;

    fn full_env() -> MapEnv {
        MapEnv::new()
            .with("ALCHEMY_API_KEY", "ABC123")
            .with("PRIVATE_KEY", "0xdead")
    }

    #[test]
    fn goerli_interpolates_environment() {
        let config = ConfigLoader::new(full_env()).load();
        let goerli = config.network("goerli").unwrap();

        assert!(goerli.url.as_deref().unwrap().ends_with("/ABC123"));
        assert_eq!(goerli.accounts, Accounts::PrivateKeys(vec!["0xdead".to_string()]));
    }

    #[test]
    fn unset_variables_interpolate_empty() {
        let config = ConfigLoader::new(MapEnv::new()).load();
        let goerli = config.network("goerli").unwrap();

        assert_eq!(goerli.url.as_deref(), Some("https://eth-goerli.g.alchemy.com/v2/"));
        assert_eq!(goerli.accounts, Accounts::PrivateKeys(vec![String::new()]));

        let tokamak = config.network("tokamak-optimism-goerli").unwrap();
        assert_eq!(tokamak.url.as_deref(), Some("https://goerli.optimism.tokamak.network"));
        assert_eq!(tokamak.accounts, Accounts::PrivateKeys(vec![String::new()]));
    }

    #[test]
    fn mnemonic_profiles_ignore_environment() {
        let expected = Accounts::Mnemonic {
            mnemonic: "test test test test test test test test test test test junk".to_string(),
        };

        for env in [MapEnv::new(), full_env()] {
            let config = ConfigLoader::new(env).load();

            let hardhat = config.network("hardhat").unwrap();
            assert!(hardhat.is_in_process());
            assert_eq!(hardhat.accounts, expected);

            let optimism = config.network("optimism").unwrap();
            assert_eq!(optimism.url.as_deref(), Some("http://127.0.0.1:8545"));
            assert_eq!(optimism.accounts, expected);
        }
    }

    #[test]
    fn load_is_deterministic() {
        let loader = ConfigLoader::new(full_env());
        let first = loader.load();
        assert_eq!(first, loader.load());
        assert_eq!(first.solidity.version, "0.8.9");
        assert_eq!(
            first.networks.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["goerli", "hardhat", "optimism", "tokamak-optimism-goerli"]
        );
    }

    #[test]
    fn resolve_network_reads_env_lazily() {
        let loader = ConfigLoader::new(MapEnv::new().with("PRIVATE_KEY", "0xbeef"));
        let tokamak = loader.resolve_network("tokamak-optimism-goerli").unwrap();
        assert_eq!(tokamak.private_keys(), Some(&["0xbeef".to_string()][..]));

        assert_eq!(
            loader.resolve_network("mainnet"),
            Err(ConfigError::UnknownNetwork("mainnet".to_string()))
        );
    }

    #[test]
    fn reports_unset_variables() {
        assert_eq!(
            ConfigLoader::new(MapEnv::new()).unset_variables(),
            vec!["ALCHEMY_API_KEY", "PRIVATE_KEY"]
        );
        assert!(ConfigLoader::new(full_env()).unset_variables().is_empty());
    }

    #[test]
    fn global_is_set_once() {
        let first = init_global(ConfigLoader::new(full_env()).load());
        let second = init_global(ConfigLoader::new(MapEnv::new()).load());
        assert!(std::ptr::eq(first, second));
        assert_eq!(second.network("goerli").unwrap().private_keys(), Some(&["0xdead".to_string()][..]));
    }

    #[test]
    fn redacted_configuration_hides_api_key() {
        let loader = ConfigLoader::new(
            MapEnv::new()
                .with("ALCHEMY_API_KEY", "SUPERSECRETKEY")
                .with("PRIVATE_KEY", "0xdead"),
        );
        let json = loader.load().redacted(&loader.redactor()).to_json(false).unwrap();

        assert!(!json.contains("SUPERSECRETKEY"));
        assert!(!json.contains("0xdead"));
        assert!(json.contains("https://eth-goerli.g.alchemy.com/v2/<redacted>"));
        assert!(json.contains("https://goerli.optimism.tokamak.network"));
    }

    #[test]
    fn redactor_ignores_unset_variables() {
        let redactor = ConfigLoader::new(MapEnv::new()).redactor();
        assert_eq!(redactor.scrub("https://eth-goerli.g.alchemy.com/v2/"), "https://eth-goerli.g.alchemy.com/v2/");
    }
}

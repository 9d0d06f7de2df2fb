use std::fmt;

use serde::Serialize;

use crate::utils::env::Redactor;
pub use crate::utils::env::REDACTED;

/// Signing accounts of a network profile
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Accounts {
    /// Accounts derived from a seed phrase
    Mnemonic { mnemonic: String },
    /// Explicit secret keys, in order
    PrivateKeys(Vec<String>),
}

impl Accounts {
    pub fn kind(&self) -> &'static str {
        match self {
            Accounts::Mnemonic { .. } => "mnemonic",
            Accounts::PrivateKeys(_) => "private-keys",
        }
    }

    pub fn redacted(&self) -> Self {
        match self {
            Accounts::Mnemonic { .. } => self.clone(),
            Accounts::PrivateKeys(keys) => Accounts::PrivateKeys(
                keys.iter()
                    .map(|key| if key.is_empty() { String::new() } else { REDACTED.to_string() })
                    .collect(),
            ),
        }
    }
}

// Keys must not leak through logs
impl fmt::Debug for Accounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accounts::Mnemonic { mnemonic } => f
                .debug_struct("Mnemonic")
                .field("mnemonic", mnemonic)
                .finish(),
            Accounts::PrivateKeys(keys) => f
                .debug_tuple("PrivateKeys")
                .field(&keys.len())
                .finish(),
        }
    }
}

/// Connection parameters for one target network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkProfile {
    /// Key of the profile in the configuration map
    #[serde(skip)]
    pub name: String,
    /// RPC endpoint, absent for the build tool's in-process network
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub accounts: Accounts,
}

impl NetworkProfile {
    pub fn is_in_process(&self) -> bool {
        self.url.is_none()
    }

    pub fn private_keys(&self) -> Option<&[String]> {
        match &self.accounts {
            Accounts::PrivateKeys(keys) => Some(keys.as_slice()),
            Accounts::Mnemonic { .. } => None,
        }
    }

    /// Copy safe to print: keys masked, secret values scrubbed from the URL
    pub fn redacted(&self, redactor: &Redactor) -> Self {
        Self {
            name: self.name.clone(),
            url: self.url.as_deref().map(|url| redactor.scrub(url)),
            accounts: self.accounts.redacted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_private_keys() {
        let accounts = Accounts::PrivateKeys(vec!["0xsecret".to_string()]);
        let printed = format!("{:?}", accounts);
        assert!(!printed.contains("0xsecret"));
        assert_eq!(printed, "PrivateKeys(1)");
    }

    #[test]
    fn redaction_keeps_empty_keys_visible() {
        let accounts = Accounts::PrivateKeys(vec!["0xsecret".to_string(), String::new()]);
        assert_eq!(
            accounts.redacted(),
            Accounts::PrivateKeys(vec![REDACTED.to_string(), String::new()])
        );
    }

    #[test]
    fn redacted_profile_scrubs_url() {
        let profile = NetworkProfile {
            name: "goerli".to_string(),
            url: Some("https://eth-goerli.g.alchemy.com/v2/SUPERSECRETKEY".to_string()),
            accounts: Accounts::PrivateKeys(vec!["0xsecret".to_string()]),
        };
        let redactor = Redactor::new(vec!["SUPERSECRETKEY".to_string(), "0xsecret".to_string()]);

        let redacted = profile.redacted(&redactor);
        assert_eq!(
            redacted.url.as_deref(),
            Some("https://eth-goerli.g.alchemy.com/v2/<redacted>")
        );
        assert_eq!(redacted.private_keys(), Some(&[REDACTED.to_string()][..]));
        assert_eq!(redacted.name, "goerli");
    }
}

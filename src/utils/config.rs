/// Network names and RPC endpoints
pub mod networks {
    /// In-process network provided by the build tool itself
    pub const HARDHAT: &str = "hardhat";
    pub const OPTIMISM: &str = "optimism";
    pub const GOERLI: &str = "goerli";
    pub const TOKAMAK_OPTIMISM_GOERLI: &str = "tokamak-optimism-goerli";

    /// Local L2 node
    pub const OPTIMISM_URL: &str = "http://127.0.0.1:8545";

    /// Alchemy endpoint, the API key is appended as the last path segment
    pub const GOERLI_ALCHEMY_URL: &str = "https://eth-goerli.g.alchemy.com/v2/";

    pub const TOKAMAK_OPTIMISM_GOERLI_URL: &str = "https://goerli.optimism.tokamak.network";
}

/// Account material and the environment variables secrets come from
pub mod accounts {
    /// Publicly known development phrase, never holds real funds
    pub const TEST_MNEMONIC: &str =
        "test test test test test test test test test test test junk";

    pub const ALCHEMY_API_KEY_VAR: &str = "ALCHEMY_API_KEY";
    pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
}

pub mod compiler {
    pub const SOLIDITY_VERSION: &str = "0.8.9";
}

pub const DEFAULT_ENV_FILE: &str = ".env";

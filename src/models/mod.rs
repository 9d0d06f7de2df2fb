pub mod config;
pub mod network;

pub use config::{CompilerSetting, ConfigError, Configuration};
pub use network::{Accounts, NetworkProfile};

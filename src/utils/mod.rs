pub mod config;
pub mod env;
pub mod ethereum;
pub mod logging;

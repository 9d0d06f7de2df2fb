pub mod loader;
pub mod probe;

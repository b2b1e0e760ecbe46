#[cfg(feature = "cli")]
pub mod cli;
pub mod file_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use file_config::{CouponerConfig, Settings, DEFAULT_CONFIG_PATH};

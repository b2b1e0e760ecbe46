use crate::config::file_config::{CouponerConfig, DEFAULT_CONFIG_PATH};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "bdm-couponer")]
#[command(about = "Scrapes published coupon codes and redeems them automatically")]
pub struct CliArgs {
    /// Path to the JSON or TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Override the family name from the config file
    #[arg(long)]
    pub family_name: Option<String>,

    /// Override the region from the config file
    #[arg(long)]
    pub region: Option<String>,

    /// Override the polling interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Override the directory holding the redeemed-coupon ledger
    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,

    /// Show which coupons would be submitted without submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    /// 命令列參數覆蓋設定檔的值
    pub fn apply_overrides(&self, config: &mut CouponerConfig) {
        if let Some(family_name) = &self.family_name {
            config.family_name = Some(family_name.clone());
        }
        if let Some(region) = &self.region {
            config.region = Some(region.clone());
        }
        if let Some(interval) = self.interval {
            config.interval = Some(interval);
        }
        if let Some(cache_dir) = &self.cache_dir {
            config.cache_dir = Some(cache_dir.clone());
        }
    }
}

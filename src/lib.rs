pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{listing::ListingSource, redeem::HttpRedeemer, storage::LocalStorage};
pub use config::{CouponerConfig, Settings};
pub use core::{couponer::Couponer, ledger::RedemptionLedger};
pub use utils::error::{CouponerError, Result};

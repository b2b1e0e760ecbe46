pub mod couponer;
pub mod ledger;

pub use crate::domain::model::{Account, CouponCode, CycleReport, RedemptionOutcome, RedemptionResponse};
pub use crate::domain::ports::{CouponRedeemer, CouponSource, Storage};
pub use crate::utils::error::Result;

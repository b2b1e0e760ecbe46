// Adapters layer: concrete implementations of the domain ports (HTTP listing, HTTP redemption, local files).

pub mod listing;
pub mod redeem;
pub mod storage;

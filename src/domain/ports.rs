use crate::domain::model::{Account, CouponCode, RedemptionResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 提供目前可兌換的優惠券代碼；任何失敗都回傳空列表
#[async_trait]
pub trait CouponSource: Send + Sync {
    async fn fetch_available_codes(&self) -> Vec<CouponCode>;
}

/// 送出兌換請求；失敗時回傳 None
#[async_trait]
pub trait CouponRedeemer: Send + Sync {
    async fn submit(&self, account: &Account, code: &CouponCode) -> Option<RedemptionResponse>;
}

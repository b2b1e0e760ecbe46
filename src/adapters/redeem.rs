use crate::domain::model::{Account, CouponCode, RedemptionResponse};
use crate::domain::ports::CouponRedeemer;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REDEEM_URL: &str =
    "https://game.world.blackdesertm.com/Coupon/ApplyCouponInWeb?";

/// 以表單 POST 向遊戲伺服器兌換優惠券
pub struct HttpRedeemer {
    url: String,
    client: Client,
}

impl HttpRedeemer {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    async fn try_submit(&self, account: &Account, code: &CouponCode) -> Result<RedemptionResponse> {
        let form = [
            ("userNickname", account.family_name.as_str()),
            ("region", account.region.as_str()),
            ("couponCode", code.as_str()),
        ];

        tracing::debug!("POST {} for coupon '{}'", self.url, code);
        let response = self.client.post(&self.url).form(&form[..]).send().await?;

        tracing::debug!("Redemption response status: {}", response.status());
        let payload: serde_json::Value = response.error_for_status()?.json().await?;

        Ok(RedemptionResponse::new(payload))
    }
}

#[async_trait]
impl CouponRedeemer for HttpRedeemer {
    async fn submit(&self, account: &Account, code: &CouponCode) -> Option<RedemptionResponse> {
        match self.try_submit(account, code).await {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::error!("❌ Failed to submit coupon '{}': {}", code, e);
                None
            }
        }
    }
}

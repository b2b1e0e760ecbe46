use crate::core::ledger::RedemptionLedger;
use crate::domain::model::{Account, CouponCode, CycleReport, RedemptionOutcome};
use crate::domain::ports::{CouponRedeemer, CouponSource, Storage};
use std::future::Future;
use std::time::Duration;

/// 兌換流程：抓取列表 -> 略過已處理代碼 -> 送出兌換 -> 依結果更新帳本
pub struct Couponer<Src, R, S>
where
    Src: CouponSource,
    R: CouponRedeemer,
    S: Storage,
{
    source: Src,
    redeemer: R,
    ledger: RedemptionLedger<S>,
    account: Account,
}

impl<Src, R, S> Couponer<Src, R, S>
where
    Src: CouponSource,
    R: CouponRedeemer,
    S: Storage,
{
    pub fn new(source: Src, redeemer: R, ledger: RedemptionLedger<S>, account: Account) -> Self {
        Self {
            source,
            redeemer,
            ledger,
            account,
        }
    }

    pub fn ledger(&self) -> &RedemptionLedger<S> {
        &self.ledger
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// 執行一輪：取得列表並處理每個尚未記錄的代碼
    pub async fn run_cycle(&mut self) -> CycleReport {
        let codes = self.source.fetch_available_codes().await;
        let mut report = CycleReport {
            listed: codes.len(),
            ..CycleReport::default()
        };

        for code in codes {
            if let Some(redeemed_at) = self.ledger.redeemed_at(&code) {
                tracing::info!(
                    "⏭️ Coupon '{}' already redeemed on {}. Skipping.",
                    code,
                    redeemed_at
                );
                report.skipped += 1;
                continue;
            }

            let outcome = self.redeem(&code).await;
            report.record(&outcome);
        }

        tracing::info!(
            "📊 Cycle finished: {} listed, {} skipped, {} submitted ({} success, {} already used, {} expired, {} failed, {} no response)",
            report.listed,
            report.skipped,
            report.submitted(),
            report.success,
            report.already_used,
            report.expired,
            report.failed,
            report.no_response
        );

        report
    }

    async fn redeem(&mut self, code: &CouponCode) -> RedemptionOutcome {
        tracing::info!("📨 Submitting coupon '{}'...", code);
        let response = self.redeemer.submit(&self.account, code).await;
        let outcome = RedemptionOutcome::classify(response.as_ref());

        match &outcome {
            RedemptionOutcome::Success => {
                tracing::info!("✅ Coupon '{}' redeemed successfully!", code)
            }
            RedemptionOutcome::AlreadyUsed => {
                tracing::info!("♻️ Coupon '{}' has already been used.", code)
            }
            RedemptionOutcome::Expired => tracing::info!("⌛ Coupon '{}' is expired.", code),
            RedemptionOutcome::OtherFailure {
                result_code,
                message,
            } => tracing::warn!(
                "❌ Failed to redeem coupon '{}': {} (resultCode: {:?})",
                code,
                message,
                result_code
            ),
            RedemptionOutcome::NoResponse => tracing::warn!(
                "❌ Failed to redeem coupon '{}': No response from server.",
                code
            ),
        }

        if outcome.is_terminal() {
            self.ledger.mark_redeemed(code).await;
        }

        outcome
    }

    /// 只列出會被送出的代碼，不送出也不寫入帳本
    pub async fn preview(&self) -> Vec<CouponCode> {
        self.source
            .fetch_available_codes()
            .await
            .into_iter()
            .filter(|code| !self.ledger.is_redeemed(code))
            .collect()
    }

    /// 無限循環執行，每輪之間等待 `interval`
    ///
    /// 等待期間若 `shutdown` 完成則結束；進行中的一輪不會被中斷。
    pub async fn run<F>(&mut self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            self.run_cycle().await;

            tracing::info!(
                "💤 Waiting for {} seconds before next check...",
                interval.as_secs()
            );
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    tracing::info!("🛑 Shutdown requested, stopping");
                    return;
                }
            }
        }
    }
}

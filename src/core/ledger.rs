use crate::domain::model::CouponCode;
use crate::domain::ports::Storage;
use crate::utils::error::{CouponerError, Result};
use chrono::Utc;
use std::collections::BTreeMap;

pub const LEDGER_FILE: &str = "redeemed.json";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 已處理優惠券的帳本：代碼 -> 進入終結狀態時的 UTC 時間
///
/// 帳本在啟動時載入一次，每次變更後整份覆寫回存儲。
pub struct RedemptionLedger<S: Storage> {
    storage: S,
    file: String,
    entries: BTreeMap<String, String>,
}

impl<S: Storage> RedemptionLedger<S> {
    /// 讀取失敗（檔案不存在或內容損壞）時回傳空帳本
    pub async fn load(storage: S, file: impl Into<String>) -> Self {
        let file = file.into();
        let entries = match Self::read_entries(&storage, &file).await {
            Ok(entries) => {
                tracing::info!("📒 Loaded {} redeemed coupon(s) from {}", entries.len(), file);
                entries
            }
            Err(CouponerError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("📒 No ledger at {}, starting empty", file);
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not read ledger {}: {}. Starting empty", file, e);
                BTreeMap::new()
            }
        };

        Self {
            storage,
            file,
            entries,
        }
    }

    async fn read_entries(storage: &S, file: &str) -> Result<BTreeMap<String, String>> {
        let data = storage.read_file(file).await?;
        let entries = serde_json::from_slice(&data)?;
        Ok(entries)
    }

    pub fn is_redeemed(&self, code: &CouponCode) -> bool {
        self.entries.contains_key(code.as_str())
    }

    pub fn redeemed_at(&self, code: &CouponCode) -> Option<&str> {
        self.entries.get(code.as_str()).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 記錄兌換時間並立即寫回；寫入失敗只記錄日誌，記憶體中的狀態保留
    pub async fn mark_redeemed(&mut self, code: &CouponCode) {
        let timestamp = Utc::now().format(TIMESTAMP_FORMAT).to_string();
        self.entries.insert(code.as_str().to_string(), timestamp);

        if let Err(e) = self.persist().await {
            tracing::error!("❌ Failed to save redeemed coupons: {}", e);
            tracing::debug!("💡 {}", e.recovery_suggestion());
        }
    }

    async fn persist(&self) -> Result<()> {
        let json = serde_json::to_vec_pretty(&self.entries)?;
        self.storage.write_file(&self.file, &json).await?;
        tracing::debug!("Ledger saved ({} entries) to {}", self.entries.len(), self.file);
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// 優惠券兌換成功
pub const RESULT_SUCCESS: i64 = 0;
/// 優惠券已被此帳號使用過
pub const RESULT_ALREADY_USED: i64 = -20007;
/// 優惠券已過期
pub const RESULT_EXPIRED: i64 = -20006;

/// 從列表頁面擷取的優惠券代碼，內容不做格式驗證
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CouponCode(String);

impl CouponCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CouponCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CouponCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// 兌換時送出的帳號資訊（家族名稱與伺服器區域）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub family_name: String,
    pub region: String,
}

impl Account {
    pub fn new(family_name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            family_name: family_name.into(),
            region: region.into(),
        }
    }
}

/// 兌換端點回傳的 JSON 內容，原樣保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionResponse {
    pub payload: serde_json::Value,
}

impl RedemptionResponse {
    pub fn new(payload: serde_json::Value) -> Self {
        Self { payload }
    }

    pub fn result_code(&self) -> Option<i64> {
        self.payload.get("resultCode").and_then(|v| v.as_i64())
    }

    pub fn result_msg(&self) -> Option<&str> {
        self.payload.get("resultMsg").and_then(|v| v.as_str())
    }

    /// 空物件、空陣列、null 等空值回應視同伺服器沒有回應
    pub fn is_empty(&self) -> bool {
        match &self.payload {
            serde_json::Value::Null => true,
            serde_json::Value::Bool(b) => !b,
            serde_json::Value::Number(n) => n.as_f64() == Some(0.0),
            serde_json::Value::String(s) => s.is_empty(),
            serde_json::Value::Array(items) => items.is_empty(),
            serde_json::Value::Object(fields) => fields.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionOutcome {
    Success,
    AlreadyUsed,
    Expired,
    /// 其他錯誤碼，或非空回應中沒有整數 resultCode
    OtherFailure {
        result_code: Option<i64>,
        message: String,
    },
    NoResponse,
}

impl RedemptionOutcome {
    pub fn classify(response: Option<&RedemptionResponse>) -> Self {
        let Some(response) = response.filter(|r| !r.is_empty()) else {
            return Self::NoResponse;
        };

        match response.result_code() {
            Some(RESULT_SUCCESS) => Self::Success,
            Some(RESULT_ALREADY_USED) => Self::AlreadyUsed,
            Some(RESULT_EXPIRED) => Self::Expired,
            result_code => Self::OtherFailure {
                result_code,
                message: response
                    .result_msg()
                    .unwrap_or("Unknown error")
                    .to_string(),
            },
        }
    }

    /// 終結狀態會寫入帳本，之後不再重送
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::AlreadyUsed | Self::Expired)
    }
}

/// 單一輪處理的統計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub listed: usize,
    pub skipped: usize,
    pub success: usize,
    pub already_used: usize,
    pub expired: usize,
    pub failed: usize,
    pub no_response: usize,
}

impl CycleReport {
    pub fn record(&mut self, outcome: &RedemptionOutcome) {
        match outcome {
            RedemptionOutcome::Success => self.success += 1,
            RedemptionOutcome::AlreadyUsed => self.already_used += 1,
            RedemptionOutcome::Expired => self.expired += 1,
            RedemptionOutcome::OtherFailure { .. } => self.failed += 1,
            RedemptionOutcome::NoResponse => self.no_response += 1,
        }
    }

    pub fn submitted(&self) -> usize {
        self.success + self.already_used + self.expired + self.failed + self.no_response
    }

    pub fn resolved(&self) -> usize {
        self.success + self.already_used + self.expired
    }
}

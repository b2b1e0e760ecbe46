use crate::adapters::listing::DEFAULT_LISTING_URL;
use crate::adapters::redeem::DEFAULT_REDEEM_URL;
use crate::domain::model::Account;
use crate::utils::error::{CouponerError, Result};
use crate::utils::validation::{
    require_non_empty, validate_min_duration, validate_path, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";
pub const DEFAULT_INTERVAL_SECONDS: u64 = 86400;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_CACHE_DIR: &str = "cache";

/// 設定檔內容，所有欄位皆可省略；必填欄位在 `resolve` 時檢查
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CouponerConfig {
    pub family_name: Option<String>,
    pub region: Option<String>,
    pub interval: Option<u64>,
    pub listing_url: Option<String>,
    pub redeem_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub cache_dir: Option<String>,
}

/// 驗證過的執行設定
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub account: Account,
    pub interval: Duration,
    pub listing_url: String,
    pub redeem_url: String,
    pub request_timeout: Duration,
    pub cache_dir: String,
}

impl CouponerConfig {
    /// 從檔案載入設定：`.toml` 以 TOML 解析，其餘以 JSON 解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let content =
            std::fs::read_to_string(path).map_err(|e| CouponerError::ConfigParseError {
                source_name: source_name.clone(),
                message: e.to_string(),
            })?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        serde_json::from_str(&processed_content).map_err(|e| CouponerError::ConfigParseError {
            source_name: "json".to_string(),
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CouponerError::ConfigParseError {
            source_name: "toml".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval.unwrap_or(DEFAULT_INTERVAL_SECONDS)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn listing_url(&self) -> &str {
        self.listing_url.as_deref().unwrap_or(DEFAULT_LISTING_URL)
    }

    pub fn redeem_url(&self) -> &str {
        self.redeem_url.as_deref().unwrap_or(DEFAULT_REDEEM_URL)
    }

    pub fn cache_dir(&self) -> &str {
        self.cache_dir.as_deref().unwrap_or(DEFAULT_CACHE_DIR)
    }

    /// 檢查必填欄位並套用預設值
    pub fn resolve(self) -> Result<Settings> {
        self.validate()?;

        let interval = Duration::from_secs(self.interval_seconds());
        let request_timeout = Duration::from_secs(self.timeout_seconds());
        let listing_url = self.listing_url().to_string();
        let redeem_url = self.redeem_url().to_string();
        let cache_dir = self.cache_dir().to_string();

        let family_name = require_non_empty("family_name", self.family_name)?;
        let region = require_non_empty("region", self.region)?;

        Ok(Settings {
            account: Account::new(family_name, region),
            interval,
            listing_url,
            redeem_url,
            request_timeout,
            cache_dir,
        })
    }
}

impl Validate for CouponerConfig {
    fn validate(&self) -> Result<()> {
        require_non_empty("family_name", self.family_name.clone())?;
        require_non_empty("region", self.region.clone())?;
        let one_second = Duration::from_secs(1);
        validate_min_duration("interval", Duration::from_secs(self.interval_seconds()), one_second)?;
        validate_min_duration(
            "request_timeout_seconds",
            Duration::from_secs(self.timeout_seconds()),
            one_second,
        )?;
        validate_url("listing_url", self.listing_url())?;
        validate_url("redeem_url", self.redeem_url())?;
        validate_path("cache_dir", self.cache_dir())?;
        Ok(())
    }
}

/// 替換環境變數 (例如 ${FAMILY_NAME})，找不到的變數保持原樣
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    use std::sync::OnceLock;

    static ENV_VAR: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(re) = ENV_VAR
        .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").ok())
        .as_ref()
    else {
        return content.to_string();
    };

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

use crate::utils::error::{CouponerError, Result};
use std::time::Duration;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CouponerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CouponerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CouponerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CouponerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CouponerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_min_duration(field_name: &str, value: Duration, min: Duration) -> Result<()> {
    if value < min {
        return Err(CouponerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: format!("{}s", value.as_secs()),
            reason: format!("Duration must be at least {} second(s)", min.as_secs()),
        });
    }
    Ok(())
}

/// 環境變數未設定時 `${VAR}` 會原樣保留
fn has_unresolved_placeholder(value: &str) -> bool {
    value
        .find("${")
        .is_some_and(|start| value[start + 2..].contains('}'))
}

/// 必填欄位：缺少、只有空白或仍含未替換的 `${VAR}` 都視為未設定；值本身原樣回傳
pub fn require_non_empty(field_name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() && !has_unresolved_placeholder(&v) => Ok(v),
        _ => Err(CouponerError::MissingConfigError {
            field: field_name.to_string(),
        }),
    }
}

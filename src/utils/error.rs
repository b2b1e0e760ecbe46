use thiserror::Error;

#[derive(Error, Debug)]
pub enum CouponerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Coupon listing error: {message}")]
    ListingError { message: String },

    #[error("Configuration parse error in '{source_name}': {message}")]
    ConfigParseError { source_name: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parse,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CouponerError {
    pub fn listing(message: impl Into<String>) -> Self {
        Self::ListingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::SerializationError(_) | Self::ListingError { .. } => ErrorCategory::Parse,
            Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigParseError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 網路與解析錯誤會在下一輪自動重試，設定錯誤則無法繼續執行
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Parse => ErrorSeverity::Medium,
            ErrorCategory::Storage => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_timeout() => {
                "The remote server did not answer in time; it will be retried next cycle".to_string()
            }
            Self::HttpError(_) => "Check network connectivity and the configured URLs".to_string(),
            Self::IoError(_) => "Check that the cache directory exists and is writable".to_string(),
            Self::SerializationError(_) => {
                "The data is not valid JSON; delete or fix the offending file".to_string()
            }
            Self::ListingError { .. } => {
                "The coupon listing page layout may have changed".to_string()
            }
            Self::ConfigParseError { .. } => {
                "Make sure the config file exists and is valid JSON or TOML".to_string()
            }
            Self::MissingConfigError { field } => {
                format!("Set '{}' in the config file or pass it on the command line", field)
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the config file", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => {
                format!("{} not set in configuration.", field)
            }
            Self::ConfigParseError { source_name, .. } => {
                format!("Failed to load configuration from '{}'.", source_name)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CouponerError>;

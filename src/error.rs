use config::ConfigError;
use thiserror::Error;

use crate::config::ValidationError;

/// 日期時間工具錯誤類型
#[derive(Error, Debug)]
pub enum DtHelperError {
    /// 時間戳字串不符合預期格式
    #[error("時間戳格式錯誤: {value:?}, {message}")]
    InvalidTimestamp { value: String, message: String },

    /// 相對時間長度字串不符合 `N:unit` 格式
    #[error("時間長度格式錯誤: {value:?}, {message}")]
    InvalidDuration { value: String, message: String },

    /// 無法識別的 IANA 時區名稱
    #[error("無效的時區: {0}")]
    InvalidTimezone(String),

    /// strftime 格式字串無效
    #[error("無效的時間格式字串: {0:?}")]
    InvalidFormat(String),

    /// 本地時間在該時區無法表示
    #[error("本地時間 {local} 在時區 {timezone} 中無法表示")]
    UnrepresentableLocalTime { local: String, timezone: String },

    /// 時間範圍的起點大於終點
    #[error("時間範圍錯誤: {descriptor} 的起點 {start} 大於終點 {end}")]
    InvertedRange {
        descriptor: String,
        start: f64,
        end: f64,
    },

    /// 配置載入錯誤
    #[error("配置錯誤: {0}")]
    Config(#[from] ConfigError),

    /// 配置驗證錯誤
    #[error("配置驗證錯誤: {0}")]
    Validation(#[from] ValidationError),
}

impl DtHelperError {
    pub(crate) fn timestamp(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
            message: message.into(),
        }
    }

    pub(crate) fn duration(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDuration {
            value: value.into(),
            message: message.into(),
        }
    }
}

/// 結果類型別名
pub type DtResult<T> = Result<T, DtHelperError>;

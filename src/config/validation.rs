use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use thiserror::Error;

/// 配置驗證錯誤
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("缺少必要配置項: {0}")]
    MissingField(String),

    #[error("無效的配置值: {0}")]
    InvalidValue(String),
}

/// 配置驗證器trait
pub trait Validator {
    /// 驗證配置
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 驗證配置區段
pub fn validate_config<T>(config: &T) -> Result<(), ValidationError>
where
    T: Validator,
{
    config.validate()
}

/// 驗證工具函數
pub struct ValidationUtils;

impl ValidationUtils {
    /// 檢查必要的字串欄位是否有值
    pub fn not_empty(value: &str, field_name: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field_name.to_string()));
        }
        Ok(())
    }

    /// 檢查是否為有效的 IANA 時區名稱
    pub fn valid_timezone(value: &str, field_name: &str) -> Result<(), ValidationError> {
        value.parse::<Tz>().map(|_| ()).map_err(|_| {
            ValidationError::InvalidValue(format!("{} 的值 {} 不是有效的時區", field_name, value))
        })
    }

    /// 檢查 strftime 格式字串是否可用
    pub fn valid_strftime(value: &str, field_name: &str) -> Result<(), ValidationError> {
        if StrftimeItems::new(value).any(|item| matches!(item, Item::Error)) {
            return Err(ValidationError::InvalidValue(format!(
                "{} 的值 {:?} 不是有效的時間格式",
                field_name, value
            )));
        }
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::loader::Environment;
use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 預設管理時區
pub const DEFAULT_ADMIN_TIMEZONE: &str = "America/Chicago";

/// 預設管理顯示格式
pub const DEFAULT_ADMIN_DATE_FMT: &str = "%a %m/%d/%Y %I:%M:%S %p";

/// 管理介面顯示用的時間設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSettings {
    pub admin_timezone: String,
    pub admin_date_fmt: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            admin_timezone: DEFAULT_ADMIN_TIMEZONE.to_string(),
            admin_date_fmt: DEFAULT_ADMIN_DATE_FMT.to_string(),
        }
    }
}

impl Validator for AdminSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.admin_timezone, "admin_timezone")?;
        ValidationUtils::valid_timezone(&self.admin_timezone, "admin_timezone")?;
        ValidationUtils::not_empty(&self.admin_date_fmt, "admin_date_fmt")?;
        ValidationUtils::valid_strftime(&self.admin_date_fmt, "admin_date_fmt")?;

        Ok(())
    }
}

/// 解析後的完整設定
///
/// `values` 保存所有已合併的設定值（環境變數 > 當前環境區段 > `[default]`），
/// `admin` 則是其中經過驗證的管理設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub environment: Environment,
    pub admin: AdminSettings,
    pub values: BTreeMap<String, String>,
}

impl Settings {
    /// 以合併後的設定值建立設定
    pub fn from_values(
        environment: Environment,
        values: BTreeMap<String, String>,
    ) -> Result<Self, ValidationError> {
        let field = |name: &str| {
            values
                .get(name)
                .cloned()
                .ok_or_else(|| ValidationError::MissingField(name.to_string()))
        };

        let admin = AdminSettings {
            admin_timezone: field("admin_timezone")?,
            admin_date_fmt: field("admin_date_fmt")?,
        };
        admin.validate()?;

        Ok(Self {
            environment,
            admin,
            values,
        })
    }

    /// 取得任意設定值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn admin_timezone(&self) -> &str {
        &self.admin.admin_timezone
    }

    pub fn admin_date_fmt(&self) -> &str {
        &self.admin.admin_date_fmt
    }
}

impl Default for Settings {
    fn default() -> Self {
        let admin = AdminSettings::default();
        let values = BTreeMap::from([
            ("admin_timezone".to_string(), admin.admin_timezone.clone()),
            ("admin_date_fmt".to_string(), admin.admin_date_fmt.clone()),
        ]);

        Self {
            environment: Environment::default(),
            admin,
            values,
        }
    }
}

/// 設定管理模組
///
/// 本模組負責加載、驗證和管理全局設定（管理時區與顯示格式）。
/// 設定來源依序為內建 `settings.ini`、使用者設定檔與環境變數。
// 宣告子模組
pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigExt, ConfigLoader, Environment};
pub use manager::{admin_date_fmt, admin_timezone, get_setting, get_settings, init_settings};
pub use types::*;
pub use validation::{validate_config, ValidationError, ValidationUtils, Validator};

use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::loader::{ConfigExt, ConfigLoader, Environment};
use crate::config::types::Settings;
use crate::error::DtResult;

// 全局設定實例
static SETTINGS: OnceCell<Settings> = OnceCell::new();

/// 獲取全局設定實例
///
/// 首次呼叫時載入設定；載入失敗時記錄警告並使用內建預設值。
pub fn get_settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        Settings::load_from_env().unwrap_or_else(|err| {
            warn!("無法加載設定，使用內建預設值: {}", err);
            Settings::default()
        })
    })
}

/// 初始化設定（在應用程序啟動時調用）
pub fn init_settings() -> DtResult<()> {
    let settings = Settings::load_from_env()?;

    if SETTINGS.set(settings).is_err() {
        warn!("設定已經被初始化，跳過重複初始化");
    } else {
        debug!("設定初始化成功，環境：{:?}", Environment::from_env());
    }

    Ok(())
}

/// 取得設定值，不存在時返回 `default`
pub fn get_setting(name: &str, default: &str) -> String {
    get_settings()
        .get(name)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

/// 管理時區名稱
pub fn admin_timezone() -> &'static str {
    get_settings().admin_timezone()
}

/// 管理顯示格式
pub fn admin_date_fmt() -> &'static str {
    get_settings().admin_date_fmt()
}

/// Settings 加載方法實現
impl Settings {
    /// 從環境變數指定的環境與設定檔加載設定
    pub fn load_from_env() -> DtResult<Self> {
        let env = Environment::from_env();
        debug!("從環境加載設定: {:?}", env);
        Self::load(&ConfigLoader::from_env(), env)
    }

    /// 以指定的加載器與環境加載設定
    pub fn load(loader: &ConfigLoader, env: Environment) -> DtResult<Self> {
        let config_source = loader.load()?;

        let mut values: BTreeMap<String, String> =
            config_source.get_section("default").unwrap_or_default();

        // 當前環境區段覆寫 [default]
        if let Ok(section) = config_source.get_section::<BTreeMap<String, String>>(env.as_section()) {
            values.extend(section);
        }

        // 環境變數優先級最高
        values.extend(config_source.top_level_strings()?);

        let settings = Self::from_values(env, values)?;
        debug!(
            "設定加載完成: admin_timezone={}, admin_date_fmt={}",
            settings.admin_timezone(),
            settings.admin_date_fmt()
        );

        Ok(settings)
    }
}

use config::{Config, ConfigError, Environment as ConfigEnvironment, File, FileFormat, Map, Source};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// 內建的預設設定檔
pub const DEFAULT_SETTINGS: &str = include_str!("../../settings.ini");

/// 指定使用者設定檔路徑的環境變數
pub const SETTINGS_FILE_VAR: &str = "DT_HELPER_SETTINGS";

/// 覆寫設定值的環境變數前綴
pub const ENV_PREFIX: &str = "DT_HELPER";

// `DT_HELPER_SETTINGS` 去除前綴後的鍵名，指向設定檔而非設定值
const SETTINGS_FILE_KEY: &str = "settings";

/// 所有設定檔區段名稱
pub const SECTIONS: [&str; 4] = ["default", "dev", "test", "prod"];

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    /// 從環境變數 `APP_ENV` 取得當前環境設定
    pub fn from_env() -> Self {
        Self::from_value(env::var("APP_ENV").ok().as_deref())
    }

    /// 解析環境名稱，無法識別時使用開發環境
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("test") | Some("testing") => Environment::Test,
            Some("prod") | Some("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為設定檔區段名稱
    pub fn as_section(&self) -> &'static str {
        match self {
            Environment::Development => "dev",
            Environment::Test => "test",
            Environment::Production => "prod",
        }
    }
}

/// 配置加載器，負責組合內建設定、使用者設定檔與環境變數
#[derive(Debug, Default)]
pub struct ConfigLoader {
    settings_file: Option<PathBuf>,
    env_source: Option<Map<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用 `DT_HELPER_SETTINGS` 指定的使用者設定檔
    pub fn from_env() -> Self {
        Self {
            settings_file: env::var_os(SETTINGS_FILE_VAR).map(PathBuf::from),
            env_source: None,
        }
    }

    /// 設定使用者設定檔路徑（檔案不存在時略過）
    pub fn with_settings_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    /// 以指定的鍵值取代行程環境變數
    pub fn with_env_source(mut self, source: Map<String, String>) -> Self {
        self.env_source = Some(source);
        self
    }

    /// 載入配置
    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut config_builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Ini));

        if let Some(path) = &self.settings_file {
            config_builder = config_builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Ini)
                    .required(false),
            );
        }

        // 從環境變數加載配置（優先級高於文件配置）
        config_builder = config_builder.add_source(
            ConfigEnvironment::with_prefix(ENV_PREFIX)
                .try_parsing(false)
                .source(self.env_source.clone()),
        );

        config_builder.build()
    }
}

/// 配置獲取輔助特性
pub trait ConfigExt {
    /// 從配置中獲取並反序列化指定部分
    fn get_section<'a, T: Deserialize<'a>>(&'a self, section: &str) -> Result<T, ConfigError>;

    /// 取得頂層（非區段）的字串設定值
    fn top_level_strings(&self) -> Result<Map<String, String>, ConfigError>;
}

impl ConfigExt for Config {
    fn get_section<'a, T: Deserialize<'a>>(&'a self, section: &str) -> Result<T, ConfigError> {
        self.get(section)
    }

    fn top_level_strings(&self) -> Result<Map<String, String>, ConfigError> {
        Ok(self
            .collect()?
            .into_iter()
            .filter(|(key, _)| !SECTIONS.contains(&key.as_str()) && key != SETTINGS_FILE_KEY)
            .filter_map(|(key, value)| value.into_string().ok().map(|v| (key, v)))
            .collect())
    }
}

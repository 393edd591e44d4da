// 模組定義
pub mod config;
pub mod error;
pub mod time_range;
pub mod utils;

pub use config::{admin_date_fmt, admin_timezone, get_setting, init_settings};
pub use error::{DtHelperError, DtResult};
pub use time_range::{get_time_ranges_and_args, TimeRange, TimeRangeArgs, TimeRanges};
pub use utils::*;

// utils.rs - 日期時間工具模組
//
// 提供日期時間、UTC 浮點字串與時區之間的轉換函數。

pub mod date_string;
pub mod duration;
pub mod float_string;
pub mod pretty;
pub mod time_utils;

// 重新導出工具函數，使其可以通過 utils::function_name 直接訪問
pub use date_string::{
    date_start_utc,
    date_string_to_datetime,
    date_string_to_local_datetime,
    date_string_to_utc_float_string,
    parse_partial_timestamp,
    partial_timestamp_to_utc,
    DATE_FMT,
};
pub use duration::{parse_num_unit, utc_ago_float_string, utc_later_float_string, TimeUnit};
pub use float_string::{
    // 浮點字串轉換
    dt_to_float_string,
    dt_to_utc_float,
    float_string_to_dt,
    float_value,
    // strftime 輸出
    format_datetime,
    format_naive,
    ToFloatString,
    FLOAT_STRING_FMT,
};
pub use pretty::{
    get_timestamp_formatter_from_args,
    utc_float_to_pretty,
    utc_now_pretty,
    TimestampFormatter,
};
pub use time_utils::{
    // 目前時間
    get_utcnow,
    local_now_string,
    utc_now_float_string,
    utc_now_iso,
    utc_now_localized,

    // 時區轉換
    days_ago,
    days_ago_at,
    localize,
    parse_timezone,
    utc_to_timezone,
};

use chrono::{NaiveDate, NaiveDateTime};

/// 固定的參考時間（UTC 浮點字串）
pub const NOW: &str = "20230722150000.0";

/// 建立無時區的日期時間
pub fn naive(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("invalid test datetime")
}

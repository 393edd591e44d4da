// float_string.rs
//
// UTC 浮點字串時間戳 `YYYYMMDDHHMMSS.ffffff` 的格式化與解析。
// 小數部分代表微秒：格式化時去除尾端的 0（至少保留一位），
// 解析時 1 到 6 位數字向右補 0。

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use std::fmt::{self, Write};
use std::ops::RangeInclusive;

use crate::error::{DtHelperError, DtResult};

/// 浮點字串的 chrono 格式
pub const FLOAT_STRING_FMT: &str = "%Y%m%d%H%M%S%.6f";

const WHOLE_DIGITS: usize = 14;
const MAX_FRACTION_DIGITS: usize = 6;

// 整數部分固定 14 位，年份只有 4 位
const YEAR_RANGE: RangeInclusive<i32> = 0..=9999;

/// 可轉換為浮點字串的值（字串、浮點數、整數或日期時間）
pub trait ToFloatString {
    fn to_float_string(&self) -> String;
}

impl ToFloatString for str {
    fn to_float_string(&self) -> String {
        self.trim().to_string()
    }
}

impl ToFloatString for String {
    fn to_float_string(&self) -> String {
        self.as_str().to_float_string()
    }
}

impl ToFloatString for f64 {
    fn to_float_string(&self) -> String {
        self.to_string()
    }
}

impl ToFloatString for i64 {
    fn to_float_string(&self) -> String {
        self.to_string()
    }
}

impl ToFloatString for u64 {
    fn to_float_string(&self) -> String {
        self.to_string()
    }
}

impl ToFloatString for NaiveDateTime {
    fn to_float_string(&self) -> String {
        dt_to_float_string(self)
    }
}

impl ToFloatString for DateTime<Utc> {
    fn to_float_string(&self) -> String {
        dt_to_float_string(&self.naive_utc())
    }
}

/// 將日期時間轉換為浮點字串
pub fn dt_to_float_string(dt: &NaiveDateTime) -> String {
    let micros = (dt.nanosecond() % 1_000_000_000) / 1_000;
    let digits = format!("{:06}", micros);
    let fraction = match digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    format!("{}.{}", dt.format("%Y%m%d%H%M%S"), fraction)
}

/// 將浮點字串（或浮點數、整數）解析為日期時間
pub fn float_string_to_dt<T: ToFloatString + ?Sized>(value: &T) -> DtResult<NaiveDateTime> {
    parse_float_string(&value.to_float_string())
}

fn parse_float_string(text: &str) -> DtResult<NaiveDateTime> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, "0"));

    if whole.len() != WHOLE_DIGITS || !is_digits(whole) {
        return Err(DtHelperError::timestamp(
            text,
            "整數部分必須是 14 位數字 YYYYMMDDHHMMSS",
        ));
    }
    if fraction.is_empty() || fraction.len() > MAX_FRACTION_DIGITS || !is_digits(fraction) {
        return Err(DtHelperError::timestamp(text, "小數部分必須是 1 到 6 位數字"));
    }

    let micros = digits_value(fraction) * 10u32.pow((MAX_FRACTION_DIGITS - fraction.len()) as u32);

    NaiveDate::from_ymd_opt(
        digits_value(&whole[0..4]) as i32,
        digits_value(&whole[4..6]),
        digits_value(&whole[6..8]),
    )
    .and_then(|date| {
        date.and_hms_micro_opt(
            digits_value(&whole[8..10]),
            digits_value(&whole[10..12]),
            digits_value(&whole[12..14]),
            micros,
        )
    })
    .ok_or_else(|| DtHelperError::timestamp(text, "不是有效的日期時間"))
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

// 呼叫前必須確認全為數字
fn digits_value(text: &str) -> u32 {
    text.bytes()
        .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// 將浮點字串（或數值）轉換為 f64
pub fn float_value<T: ToFloatString + ?Sized>(value: &T) -> DtResult<f64> {
    let text = value.to_float_string();
    match text.parse::<f64>() {
        Ok(v) if !v.is_nan() => Ok(v),
        _ => Err(DtHelperError::timestamp(text, "不是有效的數值")),
    }
}

/// 將 UTC 日期時間轉換為 f64 形式的浮點時間戳
pub fn dt_to_utc_float(dt: &NaiveDateTime) -> DtResult<f64> {
    if !is_representable(dt) {
        return Err(DtHelperError::timestamp(dt.to_string(), "年份必須介於 0000 與 9999 之間"));
    }
    float_value(&dt_to_float_string(dt))
}

/// 日期時間是否可寫成 14 位整數部分的浮點字串
pub(crate) fn is_representable(dt: &NaiveDateTime) -> bool {
    YEAR_RANGE.contains(&dt.year())
}

/// 以 strftime 格式輸出無時區的日期時間
pub fn format_naive(dt: &NaiveDateTime, fmt: &str) -> DtResult<String> {
    render(dt.format(fmt), fmt)
}

/// 以 strftime 格式輸出帶時區的日期時間
pub fn format_datetime<Tz: TimeZone>(dt: &DateTime<Tz>, fmt: &str) -> DtResult<String>
where
    Tz::Offset: fmt::Display,
{
    render(dt.format(fmt), fmt)
}

fn render(formatted: impl fmt::Display, fmt: &str) -> DtResult<String> {
    let mut out = String::new();
    write!(out, "{}", formatted).map_err(|_| DtHelperError::InvalidFormat(fmt.to_string()))?;
    Ok(out)
}

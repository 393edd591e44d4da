//! 時間範圍參數解析模組
//!
//! 將查詢參數（絕對浮點數、日曆時間戳、`since` / `until` 相對時間）轉換為
//! 描述字串 → `(start, end)` 的對應表，供建立查詢條件使用。
//!
//! 三類參數各自產生條目並寫入同一張表：
//! - `start` / `end`：UTC 浮點時間戳
//! - `start_ts` / `end_ts`：某時區的日曆時間戳，可用 `,` `;` `|` 分隔多個值
//! - `since` / `until`：`N:unit` 相對時間，分別自 `now` 往前、往後計算
//!
//! 同類的起訖值同時存在時做笛卡兒配對（起點大於終點的配對略過），
//! 只有一側時另一側使用 `0` / `+inf`。
//! 沒有任何參數時返回 `{"all": (0, inf)}`。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::admin_timezone;
use crate::error::{DtHelperError, DtResult};
use crate::utils::date_string::partial_timestamp_to_utc;
use crate::utils::duration::{reference_now, shift_by};
use crate::utils::float_string::{dt_to_utc_float, float_value, ToFloatString};
use crate::utils::time_utils::parse_timezone;

/// 沒有任何參數時使用的描述字串
pub const ALL_DESCRIPTOR: &str = "all";

/// 多值參數的分隔字元
const MULTI_VALUE_SEPARATORS: [char; 3] = [',', ';', '|'];

/// 以浮點時間戳表示的時間範圍
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    /// 不限範圍 `(0, +inf)`
    pub const ALL: TimeRange = TimeRange {
        start: 0.0,
        end: f64::INFINITY,
    };

    /// 建立時間範圍，起點大於終點時返回錯誤
    pub fn new(descriptor: &str, start: f64, end: f64) -> DtResult<Self> {
        if start > end {
            return Err(DtHelperError::InvertedRange {
                descriptor: descriptor.to_string(),
                start,
                end,
            });
        }
        Ok(Self { start, end })
    }

    /// 是否包含某個浮點時間戳（含端點）
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }

    pub fn is_bounded(&self) -> bool {
        self.end.is_finite()
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.start, self.end)
    }
}

impl From<TimeRange> for (f64, f64) {
    fn from(range: TimeRange) -> Self {
        range.as_tuple()
    }
}

/// 描述字串 → 時間範圍
pub type TimeRanges = BTreeMap<String, TimeRange>;

/// 時間範圍參數
///
/// ```
/// use dt_helper::time_range::{get_time_ranges_and_args, TimeRangeArgs};
///
/// let args = TimeRangeArgs::new()
///     .with_since("2:hours")
///     .with_now("20230722150000.0");
/// let ranges = get_time_ranges_and_args(&args).unwrap();
/// assert_eq!(ranges["since=2:hours"].as_tuple(), (20230722130000.0, f64::INFINITY));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeRangeArgs {
    /// 時區名稱，預設為管理時區
    pub tz: Option<String>,
    /// 參考時間（UTC 浮點字串），預設為目前時間
    pub now: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub start_ts: Option<String>,
    pub end_ts: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
}

impl TimeRangeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tz(mut self, tz: impl Into<String>) -> Self {
        self.tz = Some(tz.into());
        self
    }

    pub fn with_now<T: ToFloatString + ?Sized>(mut self, now: &T) -> Self {
        self.now = Some(now.to_float_string());
        self
    }

    pub fn with_start<T: ToFloatString + ?Sized>(mut self, start: &T) -> Self {
        self.start = Some(start.to_float_string());
        self
    }

    pub fn with_end<T: ToFloatString + ?Sized>(mut self, end: &T) -> Self {
        self.end = Some(end.to_float_string());
        self
    }

    pub fn with_start_ts(mut self, start_ts: impl Into<String>) -> Self {
        self.start_ts = Some(start_ts.into());
        self
    }

    pub fn with_end_ts(mut self, end_ts: impl Into<String>) -> Self {
        self.end_ts = Some(end_ts.into());
        self
    }

    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }
}

/// 依參數產生描述字串 → 時間範圍的對應表
pub fn get_time_ranges_and_args(args: &TimeRangeArgs) -> DtResult<TimeRanges> {
    let mut ranges = TimeRanges::new();

    // 絕對浮點時間戳
    insert_pairs(
        &mut ranges,
        ("start", "end"),
        &float_bound(&args.start)?,
        &float_bound(&args.end)?,
    )?;

    // 日曆時間戳
    let start_ts = split_multi(&args.start_ts);
    let end_ts = split_multi(&args.end_ts);
    if !start_ts.is_empty() || !end_ts.is_empty() {
        let tz_name = single_value(&args.tz).unwrap_or_else(|| admin_timezone());
        let tz = parse_timezone(tz_name)?;
        let resolve = |values: Vec<String>| -> DtResult<Vec<(String, f64)>> {
            values
                .into_iter()
                .map(|ts| {
                    let value = dt_to_utc_float(&partial_timestamp_to_utc(&ts, &tz)?)?;
                    Ok((ts, value))
                })
                .collect()
        };
        insert_pairs(
            &mut ranges,
            ("start_ts", "end_ts"),
            &resolve(start_ts)?,
            &resolve(end_ts)?,
        )?;
    }

    // 相對時間
    let since = split_multi(&args.since);
    let until = split_multi(&args.until);
    if !since.is_empty() || !until.is_empty() {
        let now = reference_now(args.now.as_deref())?;
        let shift = |values: Vec<String>, forward: bool| -> DtResult<Vec<(String, f64)>> {
            values
                .into_iter()
                .map(|num_unit| {
                    let shifted = shift_by(&now, &num_unit, forward)?;
                    Ok((num_unit, dt_to_utc_float(&shifted)?))
                })
                .collect()
        };
        insert_pairs(
            &mut ranges,
            ("since", "until"),
            &shift(since, false)?,
            &shift(until, true)?,
        )?;
    }

    if ranges.is_empty() {
        ranges.insert(ALL_DESCRIPTOR.to_string(), TimeRange::ALL);
    }

    debug!("解析出 {} 個時間範圍: {:?}", ranges.len(), ranges.keys().collect::<Vec<_>>());
    Ok(ranges)
}

/// 拆分以 `,` `;` `|` 分隔的多值參數，去除空白與重複值（保留首次出現的順序）
pub fn split_multi(value: &Option<String>) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for item in single_value(value)
        .into_iter()
        .flat_map(|v| v.split(MULTI_VALUE_SEPARATORS))
        .map(str::trim)
        .filter(|item| !item.is_empty())
    {
        if !values.iter().any(|existing| existing == item) {
            values.push(item.to_string());
        }
    }
    values
}

fn float_bound(value: &Option<String>) -> DtResult<Vec<(String, f64)>> {
    match single_value(value) {
        Some(text) => Ok(vec![(text.to_string(), float_value(text)?)]),
        None => Ok(Vec::new()),
    }
}

fn single_value(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// 同類起訖值：兩側皆有時笛卡兒配對，否則以 0 / +inf 補足。
// 配對中起點大於終點者略過；全部配對都反轉時返回錯誤。
fn insert_pairs(
    ranges: &mut TimeRanges,
    (start_key, end_key): (&str, &str),
    starts: &[(String, f64)],
    ends: &[(String, f64)],
) -> DtResult<()> {
    match (starts.is_empty(), ends.is_empty()) {
        (false, false) => {
            let mut first_error = None;
            let mut inserted = 0usize;

            for (start_text, start) in starts {
                for (end_text, end) in ends {
                    let descriptor = format!("{}={},{}={}", start_key, start_text, end_key, end_text);
                    match TimeRange::new(&descriptor, *start, *end) {
                        Ok(range) => {
                            ranges.insert(descriptor, range);
                            inserted += 1;
                        }
                        Err(err) => {
                            debug!("略過反轉的時間範圍: {}", descriptor);
                            first_error.get_or_insert(err);
                        }
                    }
                }
            }

            if inserted == 0 {
                if let Some(err) = first_error {
                    return Err(err);
                }
            }
        }
        (false, true) => {
            for (start_text, start) in starts {
                let descriptor = format!("{}={}", start_key, start_text);
                let range = TimeRange::new(&descriptor, *start, f64::INFINITY)?;
                ranges.insert(descriptor, range);
            }
        }
        (true, false) => {
            for (end_text, end) in ends {
                let descriptor = format!("{}={}", end_key, end_text);
                let range = TimeRange::new(&descriptor, 0.0, *end)?;
                ranges.insert(descriptor, range);
            }
        }
        (true, true) => {}
    }

    Ok(())
}

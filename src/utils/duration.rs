// duration.rs
//
// 相對時間長度 `N:unit`（例如 `15:seconds`、`1.5:weeks`）的解析與計算。

use chrono::{Duration, NaiveDateTime};

use crate::error::{DtHelperError, DtResult};
use crate::utils::float_string::{dt_to_float_string, float_string_to_dt, is_representable};
use crate::utils::time_utils::get_utcnow;

/// 時間單位，接受全名或縮寫（`se`conds、`mi`nutes、`h`ours 等）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    /// 以 30 天計
    Months,
    /// 以 365 天計
    Years,
}

impl TimeUnit {
    // 單位全名與最短可接受的縮寫長度
    const NAMES: [(&'static str, usize, TimeUnit); 7] = [
        ("seconds", 2, TimeUnit::Seconds),
        ("minutes", 2, TimeUnit::Minutes),
        ("hours", 1, TimeUnit::Hours),
        ("days", 1, TimeUnit::Days),
        ("weeks", 1, TimeUnit::Weeks),
        ("months", 2, TimeUnit::Months),
        ("years", 1, TimeUnit::Years),
    ];

    /// 解析單位名稱（不分大小寫），名稱必須是單位全名的縮寫，例如 `h`、`sec`、`week`
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::NAMES
            .iter()
            .find(|(full, min_len, _)| name.len() >= *min_len && full.starts_with(name.as_str()))
            .map(|(_, _, unit)| *unit)
    }

    /// 每單位的秒數
    pub fn seconds(&self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3_600,
            TimeUnit::Days => 86_400,
            TimeUnit::Weeks => 7 * 86_400,
            TimeUnit::Months => 30 * 86_400,
            TimeUnit::Years => 365 * 86_400,
        }
    }
}

/// 解析 `N:unit` 字串為時間長度，`N` 可為非負小數
pub fn parse_num_unit(num_unit: &str) -> DtResult<Duration> {
    let (num, unit) = num_unit
        .split_once(':')
        .ok_or_else(|| DtHelperError::duration(num_unit, "必須是 N:unit 格式"))?;

    let amount: f64 = num
        .trim()
        .parse()
        .map_err(|_| DtHelperError::duration(num_unit, "數值部分無法解析"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(DtHelperError::duration(num_unit, "數值必須是非負的有限數"));
    }

    let unit = TimeUnit::from_name(unit).ok_or_else(|| {
        DtHelperError::duration(
            num_unit,
            "單位必須是 seconds、minutes、hours、days、weeks、months 或 years",
        )
    })?;

    let micros = (amount * unit.seconds() as f64 * 1e6).round();
    if micros >= i64::MAX as f64 {
        return Err(DtHelperError::duration(num_unit, "時間長度過大"));
    }

    Ok(Duration::microseconds(micros as i64))
}

/// 以 `now`（浮點字串，預設為目前 UTC 時間）為基準，往前 `num_unit` 的浮點字串
pub fn utc_ago_float_string(num_unit: &str, now: Option<&str>) -> DtResult<String> {
    let dt = shift_by(&reference_now(now)?, num_unit, false)?;
    Ok(dt_to_float_string(&dt))
}

/// 以 `now`（浮點字串，預設為目前 UTC 時間）為基準，往後 `num_unit` 的浮點字串
pub fn utc_later_float_string(num_unit: &str, now: Option<&str>) -> DtResult<String> {
    let dt = shift_by(&reference_now(now)?, num_unit, true)?;
    Ok(dt_to_float_string(&dt))
}

/// 將 `now` 往後（`forward`）或往前平移 `num_unit`，結果必須仍可寫成浮點字串
pub(crate) fn shift_by(now: &NaiveDateTime, num_unit: &str, forward: bool) -> DtResult<NaiveDateTime> {
    let delta = parse_num_unit(num_unit)?;
    let shifted = if forward {
        now.checked_add_signed(delta)
    } else {
        now.checked_sub_signed(delta)
    };

    shifted
        .filter(is_representable)
        .ok_or_else(|| DtHelperError::duration(num_unit, "結果超出 0000 至 9999 年的範圍"))
}

pub(crate) fn reference_now(now: Option<&str>) -> DtResult<NaiveDateTime> {
    match now.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => float_string_to_dt(text),
        None => Ok(get_utcnow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("15:seconds", Duration::seconds(15))]
    #[case("2:hours", Duration::hours(2))]
    #[case("30:minutes", Duration::minutes(30))]
    #[case("1:days", Duration::days(1))]
    #[case("1.5:weeks", Duration::hours(252))]
    #[case("1:week", Duration::weeks(1))]
    #[case("3:h", Duration::hours(3))]
    #[case("2:Months", Duration::days(60))]
    #[case("1:years", Duration::days(365))]
    #[case("0:seconds", Duration::zero())]
    #[case(" 4 : hours ", Duration::hours(4))]
    #[case("10:sec", Duration::seconds(10))]
    #[case("5:min", Duration::minutes(5))]
    #[case("2:d", Duration::days(2))]
    fn test_parse_num_unit(#[case] input: &str, #[case] expected: Duration) {
        assert_eq!(parse_num_unit(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("2hours")]
    #[case("two:hours")]
    #[case("2:")]
    #[case("2:m")]
    #[case("2:s")]
    #[case("2:fortnights")]
    #[case("2:dogs")]
    #[case("2:hrs")]
    #[case("2:secondsx")]
    #[case("-1:days")]
    #[case("inf:days")]
    #[case("1e30:years")]
    fn test_parse_num_unit_rejects(#[case] input: &str) {
        let err = parse_num_unit(input).unwrap_err();
        assert!(matches!(err, DtHelperError::InvalidDuration { .. }));
    }

    #[test]
    fn test_utc_ago_float_string() {
        let result = utc_ago_float_string("2:hours", Some("20230722153045.0")).unwrap();
        assert_eq!(result, "20230722133045.0");

        let result = utc_ago_float_string("1:days", Some("20230301000000.5")).unwrap();
        assert_eq!(result, "20230228000000.5");
    }

    #[test]
    fn test_utc_later_float_string() {
        let result = utc_later_float_string("30:minutes", Some("20231231234500")).unwrap();
        assert_eq!(result, "20240101001500.0");
    }

    #[test]
    fn test_utc_ago_float_string_defaults_to_now() {
        let result = utc_ago_float_string("1:seconds", None).unwrap();
        let dt = float_string_to_dt(result.as_str()).unwrap();
        let diff = (get_utcnow() - dt).num_seconds();
        assert!((0..5).contains(&diff), "差異應介於0與5秒之間，實際差異: {}", diff);
    }

    #[test]
    fn test_shift_beyond_year_9999_is_rejected() {
        let err = utc_later_float_string("9000:years", Some("20230722150000.0")).unwrap_err();
        assert!(matches!(err, DtHelperError::InvalidDuration { .. }));
    }

    #[test]
    fn test_shift_before_year_0_is_rejected() {
        let err = utc_ago_float_string("2100:years", Some("20230722150000.0")).unwrap_err();
        assert!(matches!(err, DtHelperError::InvalidDuration { .. }));
    }

    #[test]
    fn test_shift_to_range_edges_round_trips() {
        let later = utc_later_float_string("1:days", Some("99991230000000.0")).unwrap();
        assert_eq!(later, "99991231000000.0");
        assert!(float_string_to_dt(later.as_str()).is_ok());

        let ago = utc_ago_float_string("1:days", Some("00000102000000.0")).unwrap();
        assert_eq!(ago, "00000101000000.0");
        assert!(float_string_to_dt(ago.as_str()).is_ok());
    }

    #[test]
    fn test_utc_ago_float_string_bad_now() {
        let err = utc_ago_float_string("1:hours", Some("yesterday")).unwrap_err();
        assert!(matches!(err, DtHelperError::InvalidTimestamp { .. }));
    }
}

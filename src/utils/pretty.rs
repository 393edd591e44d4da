// pretty.rs
//
// 將 UTC 浮點時間戳格式化為易讀字串。

use crate::config::{admin_date_fmt, admin_timezone};
use crate::error::DtResult;
use crate::utils::float_string::{float_string_to_dt, format_datetime, format_naive, ToFloatString};
use crate::utils::time_utils::{get_utcnow, parse_timezone};

/// 將 UTC 浮點時間戳格式化
///
/// 未指定 `fmt` 時使用管理顯示格式，且時區預設為管理時區；
/// 指定 `fmt` 時只有在提供 `timezone` 的情況下才轉換時區。
pub fn utc_float_to_pretty<T: ToFloatString + ?Sized>(
    utc_float: &T,
    fmt: Option<&str>,
    timezone: Option<&str>,
) -> DtResult<String> {
    let dt = float_string_to_dt(utc_float)?;

    let (fmt, timezone) = match fmt {
        Some(fmt) => (fmt, timezone),
        None => (admin_date_fmt(), Some(timezone.unwrap_or_else(|| admin_timezone()))),
    };

    match timezone {
        Some(name) => {
            let tz = parse_timezone(name)?;
            format_datetime(&dt.and_utc().with_timezone(&tz), fmt)
        }
        None => format_naive(&dt, fmt),
    }
}

/// 將目前的 UTC 時間格式化，規則同 [`utc_float_to_pretty`]
pub fn utc_now_pretty(fmt: Option<&str>, timezone: Option<&str>) -> DtResult<String> {
    utc_float_to_pretty(&get_utcnow(), fmt, timezone)
}

/// 時間戳格式化器
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormatter {
    /// 原樣返回浮點字串
    Identity,
    /// 以指定格式與時區輸出
    Pretty {
        fmt: Option<String>,
        timezone: Option<String>,
    },
}

impl TimestampFormatter {
    pub fn format<T: ToFloatString + ?Sized>(&self, utc_float: &T) -> DtResult<String> {
        match self {
            TimestampFormatter::Identity => Ok(utc_float.to_float_string()),
            TimestampFormatter::Pretty { fmt, timezone } => {
                utc_float_to_pretty(utc_float, fmt.as_deref(), timezone.as_deref())
            }
        }
    }
}

/// 依參數建立時間戳格式化器
///
/// - `admin_fmt`：使用管理顯示格式與管理時區（優先於其他參數）
/// - `ts_fmt` / `ts_tz`：自訂格式與時區
/// - 皆未指定時返回 [`TimestampFormatter::Identity`]
pub fn get_timestamp_formatter_from_args(
    ts_fmt: Option<&str>,
    ts_tz: Option<&str>,
    admin_fmt: bool,
) -> TimestampFormatter {
    if admin_fmt {
        return TimestampFormatter::Pretty {
            fmt: Some(admin_date_fmt().to_string()),
            timezone: Some(admin_timezone().to_string()),
        };
    }

    match (ts_fmt, ts_tz) {
        (None, None) => TimestampFormatter::Identity,
        (fmt, timezone) => TimestampFormatter::Pretty {
            fmt: fmt.map(str::to_string),
            timezone: timezone.map(str::to_string),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DtHelperError;
    use rstest::rstest;

    #[test]
    fn test_utc_float_to_pretty_custom_format() {
        let result = utc_float_to_pretty(&20230722153045.123456f64, Some("%Y-%m-%d"), None).unwrap();
        assert_eq!(result, "2023-07-22");

        let result = utc_float_to_pretty("20230722153045", Some("%Y-%m-%d"), None).unwrap();
        assert_eq!(result, "2023-07-22");
    }

    #[rstest]
    #[case("America/New_York", "08")]
    #[case("America/Chicago", "07")]
    #[case("America/Denver", "06")]
    #[case("America/Los_Angeles", "05")]
    #[case("Europe/London", "13")]
    #[case("Asia/Tokyo", "21")]
    fn test_utc_float_to_pretty_various_timezones(#[case] timezone: &str, #[case] expected: &str) {
        let result = utc_float_to_pretty("20230722120000.0", Some("%H"), Some(timezone)).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_utc_float_to_pretty_admin_defaults() {
        let result = utc_float_to_pretty("20230722203045.123456", None, Some("America/Chicago")).unwrap();
        assert_eq!(result, "Sat 07/22/2023 03:30:45 PM");
    }

    #[test]
    fn test_utc_float_to_pretty_errors() {
        assert!(matches!(
            utc_float_to_pretty("not-a-float", Some("%Y"), None).unwrap_err(),
            DtHelperError::InvalidTimestamp { .. }
        ));
        assert!(matches!(
            utc_float_to_pretty("20230722120000", Some("%H"), Some("Atlantis/City")).unwrap_err(),
            DtHelperError::InvalidTimezone(_)
        ));
    }

    #[test]
    fn test_utc_now_pretty_year() {
        let year = utc_now_pretty(Some("%Y"), None).unwrap();
        let expected = get_utcnow().format("%Y").to_string();
        assert_eq!(year, expected);
    }

    #[test]
    fn test_formatter_identity() {
        let formatter = get_timestamp_formatter_from_args(None, None, false);
        assert_eq!(formatter, TimestampFormatter::Identity);

        let value = 20230722153045.123456f64;
        assert_eq!(formatter.format(&value).unwrap(), value.to_string());
        assert_eq!(formatter.format("20230722153045.5").unwrap(), "20230722153045.5");
    }

    #[test]
    fn test_formatter_custom_format_and_timezone() {
        let formatter =
            get_timestamp_formatter_from_args(Some("%Y-%m-%d %H:%M"), Some("America/Chicago"), false);
        assert_eq!(formatter.format(&20230722203045.123456f64).unwrap(), "2023-07-22 15:30");
    }

    #[rstest]
    #[case("%Y", "2023")]
    #[case("%m/%d/%Y", "07/22/2023")]
    #[case("%H:%M:%S", "15:30:45")]
    #[case("%a %b %d", "Sat Jul 22")]
    fn test_formatter_various_formats(#[case] fmt: &str, #[case] expected: &str) {
        let formatter = get_timestamp_formatter_from_args(Some(fmt), None, false);
        assert_eq!(formatter.format(&20230722153045.123456f64).unwrap(), expected);
    }

    #[test]
    fn test_formatter_admin_fmt() {
        let formatter = get_timestamp_formatter_from_args(Some("%Y"), None, true);
        match &formatter {
            TimestampFormatter::Pretty { fmt, timezone } => {
                assert_eq!(fmt.as_deref(), Some(admin_date_fmt()));
                assert_eq!(timezone.as_deref(), Some(admin_timezone()));
            }
            TimestampFormatter::Identity => panic!("Expected Pretty formatter"),
        }
        assert!(formatter.format(&20230722153045.123456f64).unwrap().contains("2023"));
    }
}

// time_utils.rs
//
// 提供目前時間與時區轉換相關的工具函數。
// 主要功能：
// 1. 以各種形式取得目前的 UTC 與本地時間
// 2. 解析 IANA 時區並將本地時間轉換為 UTC
// 3. 計算某時區的當日零時（含夏令時間切換日）

use chrono::{DateTime, Days, Duration, Local, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::config::admin_timezone;
use crate::error::{DtHelperError, DtResult};
use crate::utils::float_string::dt_to_float_string;

// 尋找跳躍區間前的時差時回溯的時間
const GAP_LOOKBACK_HOURS: i64 = 6;

//
// 目前時間
//

/// 目前的 UTC 時間（無時區資訊）
pub fn get_utcnow() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// 目前的 UTC 時間（帶時區）
pub fn utc_now_localized() -> DateTime<Utc> {
    Utc::now()
}

/// 目前的 UTC 時間，ISO 8601 格式
pub fn utc_now_iso() -> String {
    get_utcnow().format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// 目前的 UTC 時間，浮點字串格式
pub fn utc_now_float_string() -> String {
    dt_to_float_string(&get_utcnow())
}

/// 目前的系統本地時間，浮點字串格式
pub fn local_now_string() -> String {
    dt_to_float_string(&Local::now().naive_local())
}

//
// 時區轉換
//

/// 解析 IANA 時區名稱
pub fn parse_timezone(name: &str) -> DtResult<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DtHelperError::InvalidTimezone(name.to_string()))
}

/// 將本地時間套用時區
///
/// 重複的本地時間（夏令時間結束）取較早的時刻；
/// 不存在的本地時間（夏令時間開始）以跳躍前的時差換算，相當於往後移動跳躍的長度。
pub fn localize(naive: &NaiveDateTime, tz: &Tz) -> DtResult<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            let unrepresentable = || DtHelperError::UnrepresentableLocalTime {
                local: naive.to_string(),
                timezone: tz.name().to_string(),
            };

            let before = naive
                .checked_sub_signed(Duration::hours(GAP_LOOKBACK_HOURS))
                .ok_or_else(unrepresentable)?;
            let offset = tz
                .offset_from_local_datetime(&before)
                .earliest()
                .ok_or_else(unrepresentable)?
                .fix();
            let utc = naive
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
                .ok_or_else(unrepresentable)?;

            debug!("本地時間 {} 位於 {} 的跳躍區間，改用 UTC {}", naive, tz.name(), utc);
            Ok(tz.from_utc_datetime(&utc))
        }
    }
}

/// 將 UTC 時間轉換到指定時區
pub fn utc_to_timezone(dt: &DateTime<Utc>, tz: &Tz) -> DateTime<Tz> {
    dt.with_timezone(tz)
}

/// 某時區 `days` 天前的零時，以 UTC 表示
///
/// `timezone` 為 `None` 時使用管理時區；負數天數視為 0。
pub fn days_ago(days: i64, timezone: Option<&str>) -> DtResult<DateTime<Utc>> {
    days_ago_at(days, timezone, Utc::now())
}

/// 與 [`days_ago`] 相同，但以 `now` 作為目前時間
pub fn days_ago_at(days: i64, timezone: Option<&str>, now: DateTime<Utc>) -> DtResult<DateTime<Utc>> {
    let tz = parse_timezone(timezone.unwrap_or_else(|| admin_timezone()))?;
    let days = days.max(0) as u64;

    let today = now.with_timezone(&tz).date_naive();
    let day = today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| DtHelperError::UnrepresentableLocalTime {
            local: format!("{} - {} days", today, days),
            timezone: tz.name().to_string(),
        })?;

    Ok(localize(&day.and_time(NaiveTime::MIN), &tz)?.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use rstest::rstest;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).unwrap()
    }

    fn local(y: i32, m: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_utc_now_localized_close_to_now() {
        let result = utc_now_localized();
        let diff = (result.naive_utc() - get_utcnow()).num_seconds().abs();
        assert!(diff < 5, "時間差異應小於5秒，實際差異: {}", diff);
    }

    #[test]
    fn test_utc_now_iso_parses_back() {
        let iso = utc_now_iso();
        let parsed = NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        assert!((parsed - get_utcnow()).num_seconds().abs() < 5);
    }

    #[test]
    fn test_now_float_strings_are_compact() {
        assert!(utc_now_float_string().len() >= 16);
        assert!(local_now_string().len() >= 16);
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/Chicago").unwrap(), Tz::America__Chicago);
        assert!(matches!(
            parse_timezone("Mars/Base").unwrap_err(),
            DtHelperError::InvalidTimezone(_)
        ));
    }

    #[test]
    fn test_localize_ambiguous_takes_earliest() {
        // 2023-11-05 01:30 在芝加哥出現兩次（CDT 與 CST）
        let dt = localize(&local(2023, 11, 5, 1, 30), &Tz::America__Chicago).unwrap();
        assert_eq!(dt.with_timezone(&Utc), utc(2023, 11, 5, 6, 30));
    }

    #[test]
    fn test_localize_gap_moves_forward() {
        // 2023-03-12 02:30 在芝加哥不存在
        let dt = localize(&local(2023, 3, 12, 2, 30), &Tz::America__Chicago).unwrap();
        assert_eq!(dt.with_timezone(&Utc), utc(2023, 3, 12, 8, 30));
        assert_eq!(dt.hour(), 3);
    }

    #[test]
    fn test_utc_to_timezone() {
        let dt = utc_to_timezone(&utc(2023, 7, 22, 12, 0), &Tz::Asia__Tokyo);
        assert_eq!(dt.hour(), 21);
    }

    #[rstest]
    #[case(utc(2023, 7, 22, 18, 0), 0, utc(2023, 7, 22, 5, 0))]
    #[case(utc(2023, 1, 22, 18, 0), 0, utc(2023, 1, 22, 6, 0))]
    // 芝加哥仍是 7/21 晚上
    #[case(utc(2023, 7, 22, 3, 0), 0, utc(2023, 7, 21, 5, 0))]
    #[case(utc(2023, 7, 22, 18, 0), 3, utc(2023, 7, 19, 5, 0))]
    // 跨越夏令時間開始日
    #[case(utc(2023, 3, 13, 18, 0), 0, utc(2023, 3, 13, 5, 0))]
    #[case(utc(2023, 3, 13, 18, 0), 1, utc(2023, 3, 12, 6, 0))]
    // 跨越夏令時間結束日
    #[case(utc(2023, 11, 5, 18, 0), 0, utc(2023, 11, 5, 5, 0))]
    #[case(utc(2023, 11, 6, 18, 0), 1, utc(2023, 11, 5, 5, 0))]
    #[case(utc(2023, 11, 6, 18, 0), 0, utc(2023, 11, 6, 6, 0))]
    fn test_days_ago_at_chicago(
        #[case] now: DateTime<Utc>,
        #[case] days: i64,
        #[case] expected: DateTime<Utc>,
    ) {
        assert_eq!(days_ago_at(days, Some("America/Chicago"), now).unwrap(), expected);
    }

    #[test]
    fn test_days_ago_negative_clamps_to_zero() {
        let now = utc(2023, 7, 22, 18, 0);
        assert_eq!(
            days_ago_at(-5, Some("America/Chicago"), now).unwrap(),
            days_ago_at(0, Some("America/Chicago"), now).unwrap()
        );
    }

    #[test]
    fn test_days_ago_different_timezone() {
        let now = utc(2023, 7, 22, 18, 0);
        let chicago = days_ago_at(1, Some("America/Chicago"), now).unwrap();
        let new_york = days_ago_at(1, Some("America/New_York"), now).unwrap();
        assert_eq!((chicago - new_york).num_seconds(), 3600);
    }

    #[test]
    fn test_days_ago_midnight_gap() {
        // 2018-11-04 聖保羅的 00:00 不存在，當日從 01:00 開始
        let now = utc(2018, 11, 4, 18, 0);
        let result = days_ago_at(0, Some("America/Sao_Paulo"), now).unwrap();
        assert_eq!(result, utc(2018, 11, 4, 3, 0));
    }

    #[test]
    fn test_days_ago_is_local_midnight() {
        let result = days_ago(0, Some("America/Chicago")).unwrap();
        let local = result.with_timezone(&Tz::America__Chicago);
        assert_eq!((local.hour(), local.minute(), local.second()), (0, 0, 0));
    }

    #[test]
    fn test_days_ago_invalid_timezone() {
        assert!(days_ago(0, Some("Nowhere/Land")).is_err());
    }
}

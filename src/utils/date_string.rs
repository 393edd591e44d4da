// date_string.rs
//
// 日期字串解析：指定格式解析、彈性的部分時間戳解析，以及轉換為 UTC 浮點字串。

use chrono::format::{self, Fixed, Item, Numeric, ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::config::admin_timezone;
use crate::error::{DtHelperError, DtResult};
use crate::utils::float_string::dt_to_float_string;
use crate::utils::time_utils::{localize, parse_timezone};

/// 預設日期格式
pub const DATE_FMT: &str = "%Y-%m-%d";

/// 部分時間戳可接受的格式，由最完整到最精簡
const PARTIAL_TIMESTAMP_FMTS: [&str; 9] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H",
    "%Y-%m-%dT%H",
    "%Y-%m-%d",
    "%Y-%m",
    "%Y",
];

/// 以指定格式解析日期字串，預設格式為 `%Y-%m-%d`
///
/// 缺少的時間欄位補 0、缺少的月日補 1。格式中沒有小數秒時，
/// 輸入尾端的 `.ffffff` 會先被去除。
pub fn date_string_to_datetime(date_string: &str, fmt: Option<&str>) -> DtResult<NaiveDateTime> {
    let fmt = fmt.unwrap_or(DATE_FMT);
    let text = date_string.trim();
    let text = if has_fraction_directive(fmt) || fmt.contains('.') {
        text
    } else {
        strip_fraction(text)
    };

    parse_with_defaults(text, fmt)
}

/// 解析日期字串並套用時區
pub fn date_string_to_local_datetime(
    date_string: &str,
    fmt: Option<&str>,
    timezone: &str,
) -> DtResult<DateTime<Tz>> {
    let tz = parse_timezone(timezone)?;
    localize(&date_string_to_datetime(date_string, fmt)?, &tz)
}

/// 解析 `YYYY` 到 `YYYY-MM-DD HH:MM:SS.f` 之間任意精度的時間戳
pub fn parse_partial_timestamp(timestamp: &str) -> DtResult<NaiveDateTime> {
    let text = timestamp.trim();
    PARTIAL_TIMESTAMP_FMTS
        .iter()
        .find_map(|fmt| parse_with_defaults(text, fmt).ok())
        .ok_or_else(|| {
            DtHelperError::timestamp(timestamp, "必須介於 YYYY 與 YYYY-MM-DD HH:MM:SS.f 之間")
        })
}

/// 將某時區的部分時間戳轉換為 UTC
pub fn partial_timestamp_to_utc(timestamp: &str, tz: &Tz) -> DtResult<NaiveDateTime> {
    Ok(localize(&parse_partial_timestamp(timestamp)?, tz)?.naive_utc())
}

/// 某時區中該日期的零時，以 UTC 表示
///
/// `timezone` 為 `None` 時使用管理時區。
pub fn date_start_utc(
    date_string: &str,
    fmt: Option<&str>,
    timezone: Option<&str>,
) -> DtResult<DateTime<Utc>> {
    let tz = parse_timezone(timezone.unwrap_or_else(|| admin_timezone()))?;
    let midnight = date_string_to_datetime(date_string, fmt)?
        .date()
        .and_time(NaiveTime::MIN);

    Ok(localize(&midnight, &tz)?.with_timezone(&Utc))
}

/// 將日期字串轉換為 UTC 浮點字串
///
/// 未指定 `fmt` 時使用部分時間戳解析；指定 `timezone` 時視為該時區的本地時間，
/// 否則視為 UTC。
pub fn date_string_to_utc_float_string(
    date_string: &str,
    fmt: Option<&str>,
    timezone: Option<&str>,
) -> DtResult<String> {
    let naive = match fmt {
        Some(fmt) => date_string_to_datetime(date_string, Some(fmt))?,
        None => parse_partial_timestamp(date_string)?,
    };

    let utc = match timezone {
        Some(name) => localize(&naive, &parse_timezone(name)?)?.naive_utc(),
        None => naive,
    };

    Ok(dt_to_float_string(&utc))
}

fn has_fraction_directive(fmt: &str) -> bool {
    StrftimeItems::new(fmt).any(|item| {
        matches!(
            item,
            Item::Numeric(Numeric::Nanosecond, _)
                | Item::Fixed(Fixed::Nanosecond)
                | Item::Fixed(Fixed::Nanosecond3)
                | Item::Fixed(Fixed::Nanosecond6)
                | Item::Fixed(Fixed::Nanosecond9)
                | Item::Fixed(Fixed::Internal(_))
        )
    })
}

fn strip_fraction(text: &str) -> &str {
    match text.rsplit_once('.') {
        Some((head, tail))
            if !tail.is_empty()
                && tail.bytes().all(|b| b.is_ascii_digit())
                && head.ends_with(|c: char| c.is_ascii_digit()) =>
        {
            head
        }
        _ => text,
    }
}

fn parse_with_defaults(text: &str, fmt: &str) -> DtResult<NaiveDateTime> {
    let parse_error = |kind: String| DtHelperError::timestamp(text, format!("不符合格式 {:?}: {}", fmt, kind));

    let mut parsed = Parsed::new();
    format::parse(&mut parsed, text, StrftimeItems::new(fmt))
        .map_err(|e| parse_error(e.to_string()))?;

    // 已解析的欄位不會被覆寫，設定失敗表示欄位已有值
    let date = match parsed.to_naive_date() {
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            let _ = parsed.set_month(1);
            let _ = parsed.set_day(1);
            parsed.to_naive_date()
        }
        other => other,
    }
    .map_err(|e| parse_error(e.to_string()))?;

    let time = match parsed.to_naive_time() {
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            let _ = parsed.set_hour(0);
            let _ = parsed.set_minute(0);
            let _ = parsed.set_second(0);
            parsed.to_naive_time()
        }
        other => other,
    }
    .map_err(|e| parse_error(e.to_string()))?;

    Ok(date.and_time(time))
}

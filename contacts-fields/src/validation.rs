//! Input validity per field type.
//!
//! Mirrors what an HTML `<input type=...>` would consider valid. Unknown keys
//! and `text` accept anything; empty input is always acceptable.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

static MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("month pattern is valid"));

static WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-W(\d{2})$").expect("week pattern is valid"));

static COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color pattern is valid"));

/// Whether `value` is acceptable input for the field type `type_key`.
pub fn accepts(type_key: &str, value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    match type_key {
        "email" => EMAIL.is_match(value),
        "number" => value.trim().parse::<f64>().is_ok_and(f64::is_finite),
        "date" => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        "datetime" => is_datetime(value),
        "time" => is_time(value),
        "month" => {
            MONTH.is_match(value)
                && NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok()
        }
        "week" => is_week(value),
        "url" => is_url(value),
        "tel" => is_tel(value),
        "color" => COLOR.is_match(value),
        _ => true,
    }
}

fn is_datetime(value: &str) -> bool {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
}

fn is_time(value: &str) -> bool {
    ["%H:%M", "%H:%M:%S"]
        .iter()
        .any(|fmt| NaiveTime::parse_from_str(value, fmt).is_ok())
}

fn is_week(value: &str) -> bool {
    let Some(caps) = WEEK.captures(value) else {
        return false;
    };
    let (Ok(year), Ok(week)) = (caps[1].parse::<i32>(), caps[2].parse::<u32>()) else {
        return false;
    };
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_some()
}

fn is_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

fn is_tel(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'))
}

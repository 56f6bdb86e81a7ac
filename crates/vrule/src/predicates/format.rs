//! String format checks.

use regex::Regex;
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();
static GUID_REGEX: OnceLock<Regex> = OnceLock::new();
static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
static ALPHA_NUM_SPACES_REGEX: OnceLock<Regex> = OnceLock::new();
static DATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern compiles"))
}

fn matches(value: &Value, cell: &'static OnceLock<Regex>, pattern: &str) -> bool {
    value
        .as_str()
        .is_some_and(|s| cached(cell, pattern).is_match(s))
}

pub(crate) fn email(value: &Value, _: &[Value]) -> bool {
    // RFC 5322 simplified
    matches(
        value,
        &EMAIL_REGEX,
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
}

pub(crate) fn url(value: &Value, _: &[Value]) -> bool {
    matches(value, &URL_REGEX, r"^(https?|ftp)://[^\s/$.?#].[^\s]*$")
}

pub(crate) fn guid(value: &Value, _: &[Value]) -> bool {
    matches(
        value,
        &GUID_REGEX,
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
}

pub(crate) fn ip_v4(value: &Value, _: &[Value]) -> bool {
    value.as_str().is_some_and(|s| s.parse::<Ipv4Addr>().is_ok())
}

pub(crate) fn ip_v6(value: &Value, _: &[Value]) -> bool {
    value.as_str().is_some_and(|s| s.parse::<Ipv6Addr>().is_ok())
}

pub(crate) fn ip(value: &Value, params: &[Value]) -> bool {
    ip_v4(value, params) || ip_v6(value, params)
}

/// Loose international phone number: optional `+`, separators, 7 to 15 digits.
pub(crate) fn phone(value: &Value, _: &[Value]) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let digits = s.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits) && cached(&PHONE_REGEX, r"^\+?[0-9][0-9 ()./-]*[0-9]$").is_match(s)
}

pub(crate) fn hex(value: &Value, _: &[Value]) -> bool {
    matches(value, &HEX_REGEX, r"^[0-9a-fA-F]+$")
}

pub(crate) fn alpha_num_spaces(value: &Value, _: &[Value]) -> bool {
    matches(value, &ALPHA_NUM_SPACES_REGEX, r"^[a-zA-Z0-9 ]+$")
}

/// ISO 8601 date, optionally with a time and zone.
pub(crate) fn date_string(value: &Value, _: &[Value]) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let re = cached(
        &DATE_REGEX,
        r"^(\d{4})-(\d{2})-(\d{2})(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
    );
    let Some(caps) = re.captures(s) else {
        return false;
    };
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    let (Some(year), Some(month), Some(day)) = (field(1), field(2), field(3)) else {
        return false;
    };
    let time_ok = field(4).map_or(true, |h| h < 24)
        && field(5).map_or(true, |m| m < 60)
        && field(6).map_or(true, |s| s < 60);
    (1..=12).contains(&month) && (1..=days_in_month(year, month)).contains(&day) && time_ok
}

/// Non-negative integral epoch value.
pub(crate) fn time_stamp(value: &Value, _: &[Value]) -> bool {
    value.as_u64().is_some()
}

pub(crate) fn geo_latitude(value: &Value, _: &[Value]) -> bool {
    value.as_f64().is_some_and(|v| (-90.0..=90.0).contains(&v))
}

pub(crate) fn geo_longitude(value: &Value, _: &[Value]) -> bool {
    value.as_f64().is_some_and(|v| (-180.0..=180.0).contains(&v))
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

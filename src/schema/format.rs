//! Format recognisers shared by the string and id kinds

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

use super::types::StringFormat;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const UUID_PATTERN: &str =
    r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$";
const PHONE_PATTERN: &str = r"^\+?[0-9]{10,15}$";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

static EMAIL: OnceLock<Regex> = OnceLock::new();
static UUID: OnceLock<Regex> = OnceLock::new();
static PHONE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in format pattern compiles"))
}

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_email(s: &str) -> bool {
    compiled(&EMAIL, EMAIL_PATTERN).is_match(s)
}

/// Lowercase RFC 4122 shape: version 1-5, variant 8/9/a/b.
pub fn is_uuid(s: &str) -> bool {
    compiled(&UUID, UUID_PATTERN).is_match(s)
}

/// Optional leading `+`, then 10-15 digits.
pub fn is_phone_number(s: &str) -> bool {
    compiled(&PHONE, PHONE_PATTERN).is_match(s)
}

/// True if `s` parses as a calendar date or a date-time.
///
/// Parseability is all that is required; a date-time is accepted for the
/// `date` format and vice versa.
pub fn is_date_like(s: &str) -> bool {
    let s = s.trim();
    if s.is_empty() {
        return false;
    }

    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
        || DATE_TIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
}

/// Applies the check for `format`. Unknown formats accept everything.
pub fn matches_format(format: &StringFormat, s: &str) -> bool {
    match format {
        StringFormat::Email => is_email(s),
        StringFormat::PhoneNumber => is_phone_number(s),
        StringFormat::Date | StringFormat::DateTime => is_date_like(s),
        StringFormat::Uuid => is_uuid(s),
        StringFormat::Unknown(_) => true,
    }
}

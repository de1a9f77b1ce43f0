//! 日付表記の判定と同値比較
//!
//! 対応する表記:
//! - ISO: `2025-01-15`（`/` `.` 区切りも可）
//! - 米国式: `01/15/2025`（月/日/年）
//! - 長い表記: `January 15, 2025` / `Jan. 15, 2025` / `15 January 2025`
//! - 年月: `January 2025` / `01/2025` / `2025-01`
//! - 年のみ: `2025`
//!
//! 日/月/年の `15/01/2025` は米国式と区別できないため解釈しない。
//! 月が13以上になる表記は解析失敗となり、一致扱いにはならない。

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

const MONTH_PATTERN: &str = r"(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

lazy_static! {
    static ref ISO_RE: Regex = Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})$").unwrap();
    static ref US_RE: Regex = Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").unwrap();
    static ref LONG_RE: Regex = Regex::new(&format!(
        r"(?i)^{}\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})$",
        MONTH_PATTERN
    ))
    .unwrap();
    static ref LONG_DAY_FIRST_RE: Regex = Regex::new(&format!(
        r"(?i)^(\d{{1,2}})(?:st|nd|rd|th)?\s+{}\.?,?\s+(\d{{4}})$",
        MONTH_PATTERN
    ))
    .unwrap();
    static ref MONTH_YEAR_NAME_RE: Regex =
        Regex::new(&format!(r"(?i)^{}\.?,?\s+(\d{{4}})$", MONTH_PATTERN)).unwrap();
    static ref MONTH_YEAR_SLASH_RE: Regex = Regex::new(r"^(\d{1,2})/(\d{4})$").unwrap();
    static ref YEAR_MONTH_RE: Regex = Regex::new(r"^(\d{4})-(\d{1,2})$").unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"^(\d{4})$").unwrap();
}

/// 解析済みの日付（粒度付き）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDate {
    /// 年月日
    Day(NaiveDate),
    /// 年月
    Month { year: i32, month: u32 },
    /// 年のみ
    Year(i32),
}

impl ParsedDate {
    fn month(year: i32, month: u32) -> Option<Self> {
        (1..=12)
            .contains(&month)
            .then_some(ParsedDate::Month { year, month })
    }

    fn day(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(ParsedDate::Day)
    }
}

impl std::fmt::Display for ParsedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsedDate::Day(date) => {
                write!(f, "{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
            }
            ParsedDate::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            ParsedDate::Year(year) => write!(f, "{:04}", year),
        }
    }
}

/// 月名を月番号に変換
fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn capture_number<T: std::str::FromStr>(caps: &regex::Captures<'_>, index: usize) -> Option<T> {
    caps.get(index)?.as_str().parse().ok()
}

/// 日付らしい表記か判定（暦として妥当かは問わない）
pub fn is_date_like(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }

    ISO_RE.is_match(trimmed)
        || US_RE.is_match(trimmed)
        || LONG_RE.is_match(trimmed)
        || LONG_DAY_FIRST_RE.is_match(trimmed)
        || MONTH_YEAR_NAME_RE.is_match(trimmed)
        || MONTH_YEAR_SLASH_RE.is_match(trimmed)
        || YEAR_MONTH_RE.is_match(trimmed)
        || YEAR_RE.is_match(trimmed)
}

/// 日付表記を解析
///
/// 暦として存在しない日付（`02/30/2025` や日/月/年の `15/01/2025`）は `None`。
pub fn parse_date(value: &str) -> Option<ParsedDate> {
    let trimmed = value.trim();

    if let Some(caps) = ISO_RE.captures(trimmed) {
        return ParsedDate::day(
            capture_number(&caps, 1)?,
            capture_number(&caps, 2)?,
            capture_number(&caps, 3)?,
        );
    }

    if let Some(caps) = US_RE.captures(trimmed) {
        return ParsedDate::day(
            capture_number(&caps, 3)?,
            capture_number(&caps, 1)?,
            capture_number(&caps, 2)?,
        );
    }

    if let Some(caps) = LONG_RE.captures(trimmed) {
        return ParsedDate::day(
            capture_number(&caps, 3)?,
            month_from_name(caps.get(1)?.as_str())?,
            capture_number(&caps, 2)?,
        );
    }

    if let Some(caps) = LONG_DAY_FIRST_RE.captures(trimmed) {
        return ParsedDate::day(
            capture_number(&caps, 3)?,
            month_from_name(caps.get(2)?.as_str())?,
            capture_number(&caps, 1)?,
        );
    }

    if let Some(caps) = MONTH_YEAR_NAME_RE.captures(trimmed) {
        return ParsedDate::month(
            capture_number(&caps, 2)?,
            month_from_name(caps.get(1)?.as_str())?,
        );
    }

    if let Some(caps) = MONTH_YEAR_SLASH_RE.captures(trimmed) {
        return ParsedDate::month(capture_number(&caps, 2)?, capture_number(&caps, 1)?);
    }

    if let Some(caps) = YEAR_MONTH_RE.captures(trimmed) {
        return ParsedDate::month(capture_number(&caps, 1)?, capture_number(&caps, 2)?);
    }

    if let Some(caps) = YEAR_RE.captures(trimmed) {
        return Some(ParsedDate::Year(capture_number(&caps, 1)?));
    }

    None
}

/// 2つの日付表記が同じ日付を表すか
///
/// 両方が解析でき、粒度（年月日/年月/年）とすべての要素が一致する場合のみ true。
pub fn compare_dates(a: &str, b: &str) -> bool {
    match (parse_date(a), parse_date(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date_like_formats() {
        assert!(is_date_like("2025-01-15"));
        assert!(is_date_like("01/15/2025"));
        assert!(is_date_like("January 15, 2025"));
        assert!(is_date_like("Jan 15, 2025"));
        assert!(is_date_like("Jan. 15, 2025"));
        assert!(is_date_like("15 January 2025"));
        assert!(is_date_like("2025"));
        assert!(is_date_like("January 2025"));
        assert!(is_date_like("01/2025"));
        assert!(is_date_like("2025-01"));
    }

    #[test]
    fn test_is_date_like_false() {
        assert!(!is_date_like(""));
        assert!(!is_date_like("Acme Corp"));
        assert!(!is_date_like("Acme 2025"));
        assert!(!is_date_like("$1,234.56"));
        assert!(!is_date_like("123 Main St"));
    }

    #[test]
    fn test_parse_date_granularity() {
        assert_eq!(
            parse_date("2025-01-15"),
            NaiveDate::from_ymd_opt(2025, 1, 15).map(ParsedDate::Day)
        );
        assert_eq!(
            parse_date("Sept 2025"),
            Some(ParsedDate::Month { year: 2025, month: 9 })
        );
        assert_eq!(parse_date("2025"), Some(ParsedDate::Year(2025)));
    }

    #[test]
    fn test_parse_date_invalid_calendar() {
        assert_eq!(parse_date("02/30/2025"), None);
        assert_eq!(parse_date("13/2025"), None);
    }

    #[test]
    fn test_compare_dates_across_formats() {
        assert!(compare_dates("2025-01-15", "01/15/2025"));
        assert!(compare_dates("January 15, 2025", "2025-01-15"));
        assert!(compare_dates("Jan 5, 2025", "1/5/2025"));
        assert!(compare_dates("15 Jan 2025", "January 15th, 2025"));
        assert!(compare_dates("January 2025", "2025-01"));
        assert!(compare_dates("01/2025", "Jan 2025"));
        assert!(compare_dates("2025", "2025"));
    }

    #[test]
    fn test_compare_dates_mismatch() {
        assert!(!compare_dates("2025-01-15", "2025-01-16"));
        assert!(!compare_dates("2025", "2024"));
        // 粒度が異なる場合は一致しない
        assert!(!compare_dates("2025-01-15", "January 2025"));
        assert!(!compare_dates("January 2025", "2025"));
    }

    #[test]
    fn test_european_format_not_interpreted() {
        // 日/月/年は米国式として解析されるため、月が13以上なら失敗
        assert!(is_date_like("15/01/2025"));
        assert!(!compare_dates("15/01/2025", "2025-01-15"));
        // 曖昧な表記は月/日/年として解釈
        assert!(compare_dates("05/06/2025", "2025-05-06"));
        assert!(!compare_dates("05/06/2025", "2025-06-05"));
    }

    #[test]
    fn test_unparseable_never_matches() {
        assert!(!compare_dates("02/30/2025", "02/30/2025"));
        assert!(!compare_dates("not a date", "not a date"));
    }

    #[test]
    fn test_parsed_date_display() {
        assert_eq!(parse_date("1/5/2025").map(|d| d.to_string()), Some("2025-01-05".to_string()));
        assert_eq!(parse_date("Mar 2025").map(|d| d.to_string()), Some("2025-03".to_string()));
    }
}

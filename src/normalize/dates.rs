//! Date normalization for consumption readings.
//!
//! Readings come with dates in whatever format the distributor used. We try,
//! in this order:
//!
//! 1. ISO-like `YYYY-MM-DD` (anything starting with four digits and a hyphen)
//! 2. `DD/MM/YYYY`, day first
//! 3. a short list of other formats seen in the wild, including written-out
//!    English month names (`1 Mar 2023`, `March 1, 2023`)
//!
//! Failure is not an error: the caller gets `Unparseable` with the original
//! text so it can still be displayed.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;

const MONTHS_ES: [&str; 12] = [
    "ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sept.", "oct.", "nov.", "dic.",
];

// Month names are English, as chrono only knows those. `%B` also accepts the
// abbreviation when parsing.
const FALLBACK_FORMATS: [&str; 8] = [
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

static ISO_RE: OnceLock<Regex> = OnceLock::new();
static DMY_RE: OnceLock<Regex> = OnceLock::new();

fn iso_regex() -> &'static Regex {
    ISO_RE.get_or_init(|| {
        Regex::new(r"^(\d{4})-(\d{1,2})(?:-(\d{1,2}))?(?:$|[T\s])")
            .expect("iso date regex compiles")
    })
}

fn dmy_regex() -> &'static Regex {
    DMY_RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:$|\s)").expect("dmy date regex compiles")
    })
}

/// Result of normalizing a date string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedDate {
    Parsed(NaiveDate),
    /// Carries the original input verbatim.
    Unparseable(String),
}

impl NormalizedDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            NormalizedDate::Parsed(d) => Some(*d),
            NormalizedDate::Unparseable(_) => None,
        }
    }

    /// `YYYY-MM-DD` for parsed dates, the original text otherwise.
    ///
    /// Normalizing the canonical form again yields the same value.
    pub fn canonical(&self) -> String {
        match self {
            NormalizedDate::Parsed(d) => d.format("%Y-%m-%d").to_string(),
            NormalizedDate::Unparseable(raw) => raw.clone(),
        }
    }

    /// Axis label: `ene. 24` for parsed dates, the original text otherwise.
    pub fn label(&self) -> String {
        match self {
            NormalizedDate::Parsed(d) => month_label(*d),
            NormalizedDate::Unparseable(raw) => raw.clone(),
        }
    }
}

/// Normalize a date string of unknown format.
pub fn normalize_date(raw: &str) -> NormalizedDate {
    let s = raw.trim();
    if s.is_empty() {
        return NormalizedDate::Unparseable(raw.to_string());
    }

    // ISO must win over everything else: `2023-01-02` is never day-first.
    let parsed = if starts_like_iso(s) {
        parse_iso(s).or_else(|| parse_fallback(s))
    } else {
        parse_day_first(s).or_else(|| parse_fallback(s))
    };

    match parsed {
        Some(d) => NormalizedDate::Parsed(d),
        None => NormalizedDate::Unparseable(raw.to_string()),
    }
}

/// Ordering for the consumption series: parsed dates ascending, every
/// unparseable date after all parsed ones. Unparseable dates compare equal to
/// each other so a stable sort keeps their input order.
pub fn chronological(a: &NormalizedDate, b: &NormalizedDate) -> Ordering {
    match (a, b) {
        (NormalizedDate::Parsed(x), NormalizedDate::Parsed(y)) => x.cmp(y),
        (NormalizedDate::Parsed(_), NormalizedDate::Unparseable(_)) => Ordering::Less,
        (NormalizedDate::Unparseable(_), NormalizedDate::Parsed(_)) => Ordering::Greater,
        (NormalizedDate::Unparseable(_), NormalizedDate::Unparseable(_)) => Ordering::Equal,
    }
}

/// Spanish abbreviated month plus two-digit year, e.g. `sept. 23`.
pub fn month_label(date: NaiveDate) -> String {
    format!(
        "{} {:02}",
        MONTHS_ES[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

fn starts_like_iso(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 5 && b[..4].iter().all(u8::is_ascii_digit) && b[4] == b'-'
}

fn parse_iso(s: &str) -> Option<NaiveDate> {
    let caps = iso_regex().captures(s)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    // `YYYY-MM` means the first of the month.
    let day = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    let caps = dmy_regex().captures(s)?;
    let day = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let year = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

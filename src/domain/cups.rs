//! CUPS identifier validation.
//!
//! A CUPS (Código Universal de Punto de Suministro) is `ES` followed by exactly
//! 20 alphanumeric characters. Users type it in any case and with stray
//! whitespace, so input is trimmed and uppercased before the shape check.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::LookupError;

static CUPS_RE: OnceLock<Regex> = OnceLock::new();

fn cups_regex() -> &'static Regex {
    CUPS_RE.get_or_init(|| Regex::new(r"^ES[A-Z0-9]{20}$").expect("cups regex compiles"))
}

/// A validated, uppercase CUPS.
///
/// The only constructor is [`Cups::parse`], so holding a `Cups` means the
/// identifier passed validation and may be sent to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Cups(String);

impl Cups {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(LookupError::EmptyInput);
        }
        if !cups_regex().is_match(&normalized) {
            return Err(LookupError::Format);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cups {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_input_is_uppercased_and_accepted() {
        let cups = Cups::parse("es1234567890123456789a").unwrap();
        assert_eq!(cups.as_str(), "ES1234567890123456789A");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let cups = Cups::parse("  ES0021000000123456XY01  \n").unwrap();
        assert_eq!(cups.as_str(), "ES0021000000123456XY01");
    }

    #[test]
    fn empty_and_blank_input_are_empty_errors() {
        assert_eq!(Cups::parse(""), Err(LookupError::EmptyInput));
        assert_eq!(Cups::parse("   \t"), Err(LookupError::EmptyInput));
    }

    #[test]
    fn wrong_shapes_are_format_errors() {
        for raw in [
            "ES123",
            "ES1234567890123456789",   // 19 chars after ES
            "ES1234567890123456789AB", // 21 chars after ES
            "FR12345678901234567890",
            "ES12345678901234567-90",
            "ES 1234567890123456789",
            "ESÑ234567890123456789A",
        ] {
            assert_eq!(Cups::parse(raw), Err(LookupError::Format), "input {raw:?}");
        }
    }
}

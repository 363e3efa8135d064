//! Design filename parser
//!
//! Splits a design filename ("Steve 2 Star", "Amber Ms Flk 2024",
//! "John 2025") into [`ParsedDesignParts`]. Parsing is heuristic and never
//! fails: text that fits no pattern still yields a best-effort result.

use regex::Regex;
use std::sync::LazyLock;

use crate::design::{CenterType, ParsedDesignParts};
use crate::normalize::normalize_for_matching;

// Matches a version glued onto a name token: "steve2" -> ("steve", "2")
static GLUED_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*\D)(\d{1,3})$").expect("Invalid regex"));

/// Parse a design filename (stem, without extension).
///
/// The input is folded with [`normalize_for_matching`] first, so case,
/// spacing and "flake"/"flk" spelling never change the result.
pub fn parse(filename: &str) -> ParsedDesignParts {
    let normalized = normalize_for_matching(filename);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return ParsedDesignParts::default();
    }

    let (split_at, is_multiselect) = match tokens.iter().position(|t| *t == "ms") {
        Some(i) => (i, true),
        None => (
            tokens.iter().position(|t| is_center_marker(t)).unwrap_or(1),
            false,
        ),
    };

    let (name_region, remainder) = tokens.split_at(split_at);
    let mut name: Vec<&str> = name_region.to_vec();
    let mut rest: Vec<&str> = remainder.to_vec();

    // "Steve 2024 Star": a trailing year belongs to the design, not the name
    while name.len() > 1 && name.last().is_some_and(|t| is_year(t)) {
        if let Some(year) = name.pop() {
            rest.insert(0, year);
        }
    }

    let mut version = 0;
    let mut glued_stem = None;
    if let Some(last) = name.last().copied() {
        if is_version(last) {
            version = last.parse().unwrap_or(0);
            name.pop();
        } else if let Some(cap) = GLUED_VERSION_REGEX.captures(last) {
            version = cap[2].parse().unwrap_or(0);
            glued_stem = Some(cap[1].to_string());
        }
    }

    let mut base_parts: Vec<String> = name.iter().map(|t| (*t).to_string()).collect();
    if let (Some(stem), Some(last)) = (glued_stem, base_parts.last_mut()) {
        *last = stem;
    }

    ParsedDesignParts {
        base_name: base_parts.join(" "),
        is_multiselect,
        center_type: center_type(&rest),
        year: rest
            .iter()
            .find(|t| is_year(t))
            .map(|t| (*t).to_string())
            .unwrap_or_default(),
        version,
    }
}

fn is_center_marker(token: &str) -> bool {
    matches!(token, "star" | "flk" | "flake")
}

fn center_type(remainder: &[&str]) -> CenterType {
    if remainder.iter().any(|t| t.contains("star")) {
        return CenterType::Star;
    }
    let joined = remainder.join(" ");
    if joined.contains("flk") || joined.contains("flake") {
        return CenterType::Flk;
    }
    CenterType::None
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly four ASCII digits.
fn is_year(token: &str) -> bool {
    token.len() == 4 && is_all_digits(token)
}

/// One to three ASCII digits; four digits is always a year.
fn is_version(token: &str) -> bool {
    (1..=3).contains(&token.len()) && is_all_digits(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), ParsedDesignParts::default());
        assert_eq!(parse("   "), ParsedDesignParts::default());
    }

    #[test]
    fn test_ms_with_year() {
        let parts = parse("Amber Ms Flk 2024");
        assert_eq!(parts.base_name, "amber");
        assert!(parts.is_multiselect);
        assert_eq!(parts.center_type, CenterType::Flk);
        assert_eq!(parts.year, "2024");
        assert_eq!(parts.version, 0);
    }

    #[test]
    fn test_version_before_marker() {
        let parts = parse("Steve 2 Star");
        assert_eq!(parts.base_name, "steve");
        assert_eq!(parts.version, 2);
        assert_eq!(parts.year, "");
        assert_eq!(parts.center_type, CenterType::Star);
        assert!(!parts.is_multiselect);
    }

    #[test]
    fn test_glued_version() {
        let parts = parse("Steve2 Ms Flk");
        assert_eq!(parts.base_name, "steve");
        assert_eq!(parts.version, 2);
        assert!(parts.is_multiselect);
        assert_eq!(parts.center_type, CenterType::Flk);
    }

    #[test]
    fn test_year_not_mistaken_for_version() {
        let parts = parse("Steve 2024 Star");
        assert_eq!(parts.base_name, "steve");
        assert_eq!(parts.version, 0);
        assert_eq!(parts.year, "2024");
        assert_eq!(parts.center_type, CenterType::Star);

        let glued = parse("Steve2024 Star");
        assert_eq!(glued.base_name, "steve2024");
        assert_eq!(glued.version, 0);
    }

    #[test]
    fn test_single_select_year_only() {
        let parts = parse("John 2025");
        assert_eq!(parts.base_name, "john");
        assert_eq!(parts.year, "2025");
        assert_eq!(parts.center_type, CenterType::None);
        assert!(!parts.is_multiselect);
    }

    #[test]
    fn test_flake_spelling() {
        let parts = parse("Amber 3 Ms Flake");
        assert_eq!(parts.base_name, "amber");
        assert_eq!(parts.version, 3);
        assert_eq!(parts.center_type, CenterType::Flk);
    }

    #[test]
    fn test_multi_word_name() {
        let parts = parse("Mary Ann 12 Star 2023");
        assert_eq!(parts.base_name, "mary ann");
        assert_eq!(parts.version, 12);
        assert_eq!(parts.year, "2023");
    }

    #[test]
    fn test_no_marker_is_best_effort() {
        let parts = parse("Holiday Special Edition");
        assert_eq!(parts.base_name, "holiday");
        assert_eq!(parts.center_type, CenterType::None);
        assert_eq!(parts.year, "");
    }

    #[test]
    fn test_family_invariance_under_matching_normalization() {
        let samples = [
            "Amber Ms Flake 2024",
            "STEVE  2 star",
            "Snowflake Star",
            "John 2025",
            "Lily Mae 3 Ms FLK",
            "O'Neil Star",
        ];
        for sample in samples {
            let raw = parse(sample);
            let folded = parse(&normalize_for_matching(sample));
            assert_eq!(raw.base_name, folded.base_name, "{sample}");
            assert_eq!(raw.is_multiselect, folded.is_multiselect, "{sample}");
            assert_eq!(raw.center_type, folded.center_type, "{sample}");
        }
    }
}

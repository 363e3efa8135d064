//! Text normalization shared by filename generation and catalog matching.
//!
//! Two independent rule sets live here and nowhere else:
//! - [`normalize_for_filename`] turns customer-entered names into one
//!   contiguous filename token.
//! - [`normalize_for_matching`] folds already-saved filenames for lookups.
//!   It never strips punctuation.

use regex::Regex;
use std::sync::LazyLock;

/// Anything that is not a letter, digit or underscore.
static RE_NON_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]+").expect("Invalid regex"));

/// Normalize a customer-supplied name into a filename token.
///
/// - Blank input is returned unchanged.
/// - Single-case input ("LILY MAE", "katie") is title-cased per word;
///   mixed case ("McCarthy") is preserved.
/// - Punctuation and whitespace are removed ("Lily Mae" -> "LilyMae").
///
/// Applying it twice yields the same result as applying it once.
pub fn normalize_for_filename(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return raw.to_string();
    }

    let cased = if is_all_caps(trimmed) || is_all_lower(trimmed) {
        trimmed
            .split_whitespace()
            .map(title_case_word)
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        trimmed.to_string()
    };

    let token = strip_to_token(&cased);

    // Runs of single-letter words ("A B") still join into an all-caps token.
    if uppercase_count(&token) > 1 && is_all_caps(&token) {
        return strip_to_token(&title_case_word(&token));
    }

    token
}

/// Normalize a filename for catalog comparison: lower-case, collapse
/// whitespace runs to single spaces, and fold "flake" to "flk".
pub fn normalize_for_matching(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("flake", "flk")
}

/// True when the text has at least one cased character and none of them
/// are lower-case.
fn is_all_caps(text: &str) -> bool {
    let mut cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            cased = true;
        }
    }
    cased
}

fn is_all_lower(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase)
}

fn uppercase_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_uppercase()).count()
}

/// First letter upper-case, everything after it lower-case.
fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut seen_letter = false;
    for c in word.chars() {
        if !seen_letter && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            seen_letter = true;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn strip_to_token(text: &str) -> String {
    RE_NON_TOKEN.replace_all(text, "").into_owned()
}

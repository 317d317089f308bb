//! Text normalization for exact-match lookup keys.
//!
//! Normalization exists solely to build a key for the normalized
//! exact-name lookup. Fuzzy matching runs on the original parsed
//! description, not on this output.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Packaging-unit tokens, optionally preceded by an attached or
    // spaced quantity: "10ml", "10 ML", "tabs", "2 strips".
    static ref PACKAGING_UNIT: Regex = Regex::new(
        r"(?i)\b(?:\d+\s*)?(?:ml|mg|gm|gms|kg|ltr|tabs?|tablets?|caps?|capsules?|pills?|btls?|bottles?|strips?|pcs|pieces?|units?|drops?|nos)\b"
    ).unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Canonicalize raw line text for exact-match comparison.
///
/// Lowercases, replaces comma separators with spaces, strips
/// packaging-unit tokens, and collapses whitespace. Deterministic and
/// pure.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace(',', " ");
    let stripped = PACKAGING_UNIT.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_equivalence() {
        assert_eq!(
            normalize("Arnica Montana 30C, 10 ML Tabs"),
            normalize("arnica montana 30c 10ml tablets")
        );
    }

    #[test]
    fn test_strips_packaging_tokens() {
        assert_eq!(normalize("Belladonna 200 CH 100 Tablets"), "belladonna 200 ch");
        assert_eq!(normalize("Nux Vomica 30ml bottle"), "nux vomica");
    }

    #[test]
    fn test_keeps_potency_tokens() {
        // "30c" and "1m" are potencies, not packaging units.
        assert_eq!(normalize("Sulphur 30C"), "sulphur 30c");
        assert_eq!(normalize("Sulphur 1M"), "sulphur 1m");
    }

    #[test]
    fn test_commas_become_separators() {
        assert_eq!(normalize("a,b,  c"), "a b c");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize("Arnica Montana 30C, 10 ML Tabs");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty_and_unit_only_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("10 ml"), "");
    }
}

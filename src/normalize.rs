/// Reduces a display name or a raw query to its simple form: Unicode
/// letters only, lowercased.
///
/// Digits, punctuation, whitespace and hyphens are dropped entirely, so
/// `"Elisabeth-Feller-Weg"` and `"elisabethfellerweg"` simplify to the
/// same string. Idempotent: simplifying a simple form is a no-op.
pub fn simplify(input: &str) -> String {
    let letters: String = input.chars().filter(|c| c.is_alphabetic()).collect();

    // Trimming spaces and hyphens is redundant after the letter filter,
    // kept so the function stays correct if the filter is ever relaxed.
    letters.trim_matches([' ', '-']).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_drops_punctuation_and_digits() {
        assert_eq!(simplify("Elisabeth-Feller-Weg"), "elisabethfellerweg");
        assert_eq!(simplify("Aachener Straße 12"), "aachenerstraße");
        assert_eq!(simplify("  3a  "), "a");
    }

    #[test]
    fn test_simplify_keeps_unicode_letters() {
        assert_eq!(simplify("Müllerstraße"), "müllerstraße");
        assert_eq!(simplify("Özgür-Ufer"), "özgürufer");
    }

    #[test]
    fn test_simplify_empty_results() {
        assert_eq!(simplify(""), "");
        assert_eq!(simplify("12/34"), "");
        assert_eq!(simplify("- -"), "");
    }

    #[test]
    fn test_simplify_is_idempotent() {
        for input in ["Elisabeth-Feller-Weg", "Aachener Straße", "x Y z", "42"] {
            let once = simplify(input);
            assert_eq!(simplify(&once), once);
        }
    }
}

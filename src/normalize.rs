//! Case- and diacritic-folding text comparator.
//!
//! Every search and matching path goes through [`fold`] so that accented and
//! unaccented queries hit the same records. The substitution table is the
//! fixed Turkish one, applied literally; this is deliberately not a general
//! Unicode decomposition, so matching stays bit-identical across releases.

/// Fold a string for comparison: lower-case, map Turkish diacritics to their
/// base Latin letters, and collapse whitespace runs to single spaces.
///
/// Total and deterministic; empty input yields an empty string.
pub fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'ı' | 'İ' => folded.push('i'),
            'ş' | 'Ş' => folded.push('s'),
            'ğ' | 'Ğ' => folded.push('g'),
            'ü' | 'Ü' => folded.push('u'),
            'ö' | 'Ö' => folded.push('o'),
            'ç' | 'Ç' => folded.push('c'),
            _ => folded.extend(c.to_lowercase()),
        }
    }

    // Trim and collapse interior whitespace in one pass.
    let mut out = String::with_capacity(folded.len());
    for word in folded.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Substring match on folded text.
pub fn matches(haystack: &str, folded_needle: &str) -> bool {
    fold(haystack).contains(folded_needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_turkish_uppercase() {
        assert_eq!(fold("İSTANBUL"), "istanbul");
        assert_eq!(fold("istanbul"), "istanbul");
        assert_eq!(fold("İSTANBUL"), fold("istanbul"));
    }

    #[test]
    fn folds_all_table_entries() {
        assert_eq!(fold("ĞĞ"), "gg");
        assert_eq!(fold("ışŞğüÜöÖçÇı"), "issguuoocci");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(fold("  Çalıkuşu   Reşat  Nuri "), "calikusu resat nuri");
        assert_eq!(fold("a\t\nb"), "a b");
    }

    #[test]
    fn empty_input() {
        assert_eq!(fold(""), "");
        assert_eq!(fold("   "), "");
    }

    #[test]
    fn stable_across_calls() {
        let s = "Müdür İhsan ÖĞRETMEN";
        assert_eq!(fold(s), fold(s));
    }

    #[test]
    fn substring_match_is_folded() {
        assert!(matches("Kürk Mantolu Madonna", &fold("KÜRK")));
        assert!(matches("ÇALIKUŞU", &fold("calikusu")));
        assert!(!matches("Serenad", &fold("madonna")));
    }
}

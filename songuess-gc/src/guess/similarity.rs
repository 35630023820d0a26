//! Similarity scoring between normalized strings

/// Similarity of two normalized strings in `[0.0, 1.0]`
///
/// Normalized Levenshtein distance over Unicode scalar values:
/// `1 - distance / max(len(a), len(b))`. Identical inputs (including two
/// empty strings) score exactly `1.0`; every additional edit lowers the score
/// by the same step for a given length, so scores are comparable across
/// titles of different length.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    strsim::normalized_levenshtein(a, b).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scores_one() {
        for s in ["", "a", "hey jude", "the beatles", "kino"] {
            assert_eq!(similarity(s, s), 1.0, "identity failed for {:?}", s);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [("hey jude", "hey jud"), ("beatles", "the beatles"), ("", "abc")];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn test_bounded() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        let s = similarity("hey jude", "hey dude");
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn test_strictly_decreasing_with_edit_distance() {
        let target = "bohemian rhapsody";
        let one_edit = similarity(target, "bohemian rhapsodx");
        let two_edits = similarity(target, "bohemian rhapsoxx");
        let three_edits = similarity(target, "bohemian rhapsxxx");
        assert!(1.0 > one_edit);
        assert!(one_edit > two_edits);
        assert!(two_edits > three_edits);
    }

    #[test]
    fn test_normalized_by_longer_length() {
        // 1 edit over 4 chars vs 1 edit over 8 chars
        let short = similarity("abcd", "abce");
        let long = similarity("abcdefgh", "abcdefgx");
        assert!((short - 0.75).abs() < 1e-9);
        assert!((long - 0.875).abs() < 1e-9);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // Same length in chars, one substitution
        let s = similarity("añb", "aob");
        assert!((s - 2.0 / 3.0).abs() < 1e-9);
    }
}

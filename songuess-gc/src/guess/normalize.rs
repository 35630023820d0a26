//! Text normalization for guess comparison
//!
//! Canonicalizes track metadata and free-text guesses into a comparable form.
//! Streaming-service metadata is noisy ("Hey Jude - Remastered 2015",
//! "Wish You Were Here (Live)", "Ｆｕｌｌ Ｗｉｄｔｈ"), players type
//! whatever is closest on their keyboard, and both sides must land on the
//! same string before similarity is measured.

use deunicode::deunicode_with_tofu;
use unicode_normalization::UnicodeNormalization;

/// Annotation markers, applied in this order; text from the marker onward
/// is dropped
const TRUNCATION_MARKERS: [&str; 4] = ["(", "[", ": ", " - "];

/// Punctuation removed from the truncated text, first occurrence only
const STRIPPED_PUNCTUATION: [char; 10] = ['\'', ',', ';', ':', '.', '!', '?', '/', '-', '_'];

/// Normalize a title, artist, album or guess for comparison
///
/// Pipeline:
/// 1. Fold to ASCII (NFKC compatibility folding, then transliteration of
///    diacritics and non-Latin scripts) and trim
/// 2. Lower-case
/// 3. Truncate at the first `(`, then `[`, then `": "`, then `" - "`,
///    trimming trailing whitespace after each cut
/// 4. Remove the first occurrence of each of `' , ; : . ! ? / - _`
///
/// Step 4 removes exactly one occurrence per character: `"a,b,c"` becomes
/// `"ab,c"`. Match thresholds are tuned against this behavior.
pub fn normalize(input: &str) -> String {
    let mut text = transliterate(input).to_lowercase();

    for marker in TRUNCATION_MARKERS {
        truncate_at(&mut text, marker);
    }

    for ch in STRIPPED_PUNCTUATION {
        if let Some(idx) = text.find(ch) {
            text.remove(idx);
        }
    }

    text
}

/// Fold diacritics and non-Latin scripts to their closest ASCII form
///
/// NFKC keeps voiced kana composed (ガ stays one character), so the voicing
/// survives into the romanization.
fn transliterate(input: &str) -> String {
    let composed: String = input.nfkc().collect();

    // Characters without an ASCII form are dropped rather than replaced
    deunicode_with_tofu(&composed, "").trim().to_string()
}

fn truncate_at(text: &mut String, marker: &str) {
    if let Some(idx) = text.find(marker) {
        text.truncate(idx);
        let trimmed_len = text.trim_end().len();
        text.truncate(trimmed_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_trims() {
        assert_eq!(normalize("  Hey Jude  "), "hey jude");
    }

    #[test]
    fn test_strips_parenthetical_annotation() {
        assert_eq!(normalize("Hey Jude (Remastered 2015)"), "hey jude");
    }

    #[test]
    fn test_strips_bracketed_annotation() {
        assert_eq!(normalize("Dreams [2004 Remaster]"), "dreams");
    }

    #[test]
    fn test_strips_subtitle() {
        assert_eq!(normalize("Star Wars: Main Title"), "star wars");
    }

    #[test]
    fn test_strips_dash_suffix() {
        assert_eq!(normalize("Bohemian Rhapsody - Remastered 2011"), "bohemian rhapsody");
        assert_eq!(normalize("Song - Live at Wembley - 1986"), "song");
    }

    #[test]
    fn test_markers_applied_in_order() {
        // "(" is cut first, so the " - " inside the parenthesis never matters
        assert_eq!(normalize("Intro (Part 1 - Reprise) - Live"), "intro");
        assert_eq!(normalize("Title [Deluxe] (Live)"), "title");
    }

    #[test]
    fn test_leading_annotation_yields_empty() {
        assert_eq!(normalize("(Untitled)"), "");
        assert_eq!(normalize("[Intro]"), "");
    }

    #[test]
    fn test_removes_first_occurrence_of_each_punctuation_only() {
        assert_eq!(normalize("Don't Stop Me Now"), "dont stop me now");
        assert_eq!(normalize("Hello, Goodbye, Hello"), "hello goodbye, hello");
        assert_eq!(normalize("A.B.C."), "ab.c.");
    }

    #[test]
    fn test_removes_each_listed_character_once() {
        assert_eq!(normalize("a'b,c;d.e!f?g/h-i_j"), "abcdefghij");
    }

    #[test]
    fn test_colon_without_space_survives_truncation() {
        // ": " truncates, a bare ":" is only stripped in step 4
        assert_eq!(normalize("Re:Stacks"), "restacks");
    }

    #[test]
    fn test_folds_diacritics() {
        assert_eq!(normalize("Café del Mar"), "cafe del mar");
        assert_eq!(normalize("Sigur Rós"), "sigur ros");
        assert_eq!(normalize("Motörhead"), "motorhead");
    }

    #[test]
    fn test_folds_compatibility_forms() {
        assert_eq!(normalize("Ｈｅｙ"), "hey");
        assert_eq!(normalize("ﬁre"), "fire");
    }

    #[test]
    fn test_transliterates_non_latin_scripts() {
        let cyrillic = normalize("Кино");
        assert!(cyrillic.is_ascii());
        assert_eq!(cyrillic, "kino");

        let greek = normalize("Αλφα");
        assert!(greek.is_ascii());
        assert!(!greek.is_empty());

        let japanese = normalize("東京");
        assert!(japanese.is_ascii());
        assert!(!japanese.is_empty());
    }

    #[test]
    fn test_voiced_kana_keep_their_voicing() {
        assert_eq!(normalize("ガラガラ"), "garagara");
        assert_eq!(normalize("パン"), "pan");
        assert_eq!(normalize("サンバ"), "sanba");
    }

    #[test]
    fn test_half_width_kana_compose_before_transliteration() {
        assert_eq!(normalize("ｶﾞﾗｶﾞﾗ"), "garagara");
    }

    #[test]
    fn test_decomposed_accents_fold_like_composed() {
        assert_eq!(normalize("Cafe\u{301}"), normalize("Café"));
    }

    #[test]
    fn test_curly_apostrophe_folds_to_ascii_and_is_stripped() {
        assert_eq!(normalize("Don\u{2019}t Look Back"), "dont look back");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_idempotent_on_realistic_metadata() {
        let samples = [
            "Hey Jude (Remastered 2015)",
            "The Beatles",
            "Don't Stop Me Now - 2011 Remaster",
            "Sigur Rós",
            "Smells Like Teen Spirit",
            "Star Wars: Main Title",
            "Motörhead",
            "Кино",
            "AC/DC",
            "Guns N' Roses",
            "Mr. Brightside",
            "What's Up?",
            "",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_repeated_punctuation_is_not_idempotent() {
        // Known consequence of first-occurrence stripping: each pass removes
        // one more comma
        let once = normalize("a,,b");
        assert_eq!(once, "a,b");
        assert_eq!(normalize(&once), "ab");
    }
}

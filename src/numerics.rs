//! Small, pure string/word helpers shared by the diff, validator, and
//! reconciler. No struct ceremony — free functions with tests beside
//! them, the way the teacher keeps its own numeric helpers
//! (`Token::duration_ms`, `Window::proximity_to_center`) close to the
//! data they operate on.

/// Standard Levenshtein edit distance over `char`s. `O(|a|*|b|)` time and
/// space, which is acceptable since inputs here are at most a paragraph.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());

    if n == 0 {
        return m;
    }
    if m == 0 {
        return n;
    }

    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];

    for i in 1..=n {
        curr[0] = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// `levenshtein(a, b) / max(|a|, |b|)`, in `[0, 1]`. Both empty → `0`;
/// exactly one empty → `1`.
pub fn normalized_edit_distance(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / max_len as f64
}

/// Lowercase, split on whitespace runs, drop empty tokens. Used only
/// for comparison metrics (word-change ratio, etc) — never for the
/// timing-bearing token stream the reconciler walks.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Split on whitespace runs, preserving case and attached punctuation.
/// Used for reconciliation, where the surface form of each word matters.
pub fn text_to_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Join words with single spaces, then trim.
pub fn reconstruct_text<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| w.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basic() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn normalized_edit_distance_edges() {
        assert_eq!(normalized_edit_distance("same", "same"), 0.0);
        assert_eq!(normalized_edit_distance("", ""), 0.0);
        assert_eq!(normalized_edit_distance("", "abc"), 1.0);
        assert_eq!(normalized_edit_distance("abc", ""), 1.0);
        let d = normalized_edit_distance("abcd", "abce");
        assert!(d > 0.0 && d <= 1.0);
    }

    #[test]
    fn split_words_lowercases_and_drops_empties() {
        assert_eq!(
            split_words("  Hello   World  "),
            vec!["hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn text_to_words_preserves_case_and_punctuation() {
        assert_eq!(
            text_to_words("Hello, world."),
            vec!["Hello,".to_string(), "world.".to_string()]
        );
    }

    #[test]
    fn reconstruct_text_joins_and_trims() {
        assert_eq!(
            reconstruct_text(&["Hello,".to_string(), "world.".to_string()]),
            "Hello, world."
        );
    }
}

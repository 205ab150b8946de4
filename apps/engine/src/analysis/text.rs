//! Text normalization helpers shared by the segmenter, the extractors and the taxonomy.

use std::sync::OnceLock;

use regex::Regex;

/// `\w` in the Unicode sense: letters, digits, underscore.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Collapses every whitespace run to one space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes everything that is neither a word character nor whitespace.
pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect()
}

/// Normal form used by the primary skill extractor, for both resume text and variants:
/// lowercase, `.` `/` `_` `-` become spaces, other punctuation is dropped, whitespace collapsed.
pub fn normalize_skill_text(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '.' | '/' | '_' | '-' => ' ',
            other => other,
        })
        .collect();
    collapse_whitespace(&strip_punctuation(&spaced))
}

/// Normal form used by the noun-phrase fallback: lowercase, `-` and `/` become spaces,
/// whitespace collapsed. Other punctuation is kept so the annotator still sees it.
pub fn normalize_phrase_text(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c == '/' { ' ' } else { c })
        .collect();
    collapse_whitespace(&spaced)
}

/// Drops internal spaces: `"node js"` → `"nodejs"`.
pub fn collapse_spaces(text: &str) -> String {
    text.chars().filter(|&c| c != ' ').collect()
}

/// Counts non-overlapping occurrences of `needle` in `haystack` that sit on word boundaries,
/// scanning left to right like a `\bneedle\b` regex would.
pub fn count_phrase_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut pos = 0;
    while let Some(offset) = haystack[pos..].find(needle) {
        let start = pos + offset;
        let end = start + needle.len();
        if on_word_boundaries(haystack, start, end) {
            count += 1;
            pos = end;
        } else {
            // advance one character past the failed candidate
            let step = haystack[start..].chars().next().map_or(1, char::len_utf8);
            pos = start + step;
        }
        if pos >= haystack.len() {
            break;
        }
    }
    count
}

pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    count_phrase_occurrences(haystack, needle) > 0
}

/// A `\b` sits between a word and a non-word character (or the text edge).
fn on_word_boundaries(haystack: &str, start: usize, end: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let first = haystack[start..end].chars().next();
    let last = haystack[start..end].chars().next_back();
    let after = haystack[end..].chars().next();

    is_boundary(before, first) && is_boundary(last, after)
}

fn is_boundary(left: Option<char>, right: Option<char>) -> bool {
    let left_word = left.is_some_and(is_word_char);
    let right_word = right.is_some_and(is_word_char);
    left_word != right_word
}

/// Returns the cached regex, compiling it on first use.
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Regex>,
    pattern: &str,
) -> Result<&'static Regex, regex::Error> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(pattern)?;
    Ok(cell.get_or_init(|| re))
}

//! Section Segmenter — buckets resume lines into education / experience / projects / skills.

use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::text::{cached_regex, contains_phrase, strip_punctuation};
use crate::models::{Section, SectionMap};

const MAX_HEADER_LEN: usize = 50;
const MAX_HEADER_WORDS: usize = 4;

static DECIMAL_DIGIT: OnceLock<Regex> = OnceLock::new();

/// Header keywords per section, matched on word boundaries against the punctuation-stripped,
/// lowercased header line.
const SECTION_KEYWORDS: &[(Section, &[&str])] = &[
    (
        Section::Education,
        &[
            "education",
            "academic background",
            "academic qualifications",
            "academic history",
        ],
    ),
    (
        Section::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "work history",
            "employment history",
        ],
    ),
    (
        Section::Projects,
        &[
            "projects",
            "academic projects",
            "personal projects",
            "project experience",
        ],
    ),
    (
        Section::Skills,
        &[
            "skills",
            "technical skills",
            "skills and expertise",
            "areas of expertise",
        ],
    ),
];

/// Heuristic header test: short, digit-free, and either ALL CAPS or a 1–4 word line without a
/// period.
pub fn is_likely_section_header(line: &str) -> bool {
    let stripped = line.trim();

    if stripped.chars().count() > MAX_HEADER_LEN {
        return false;
    }
    if has_decimal_digit(stripped) {
        return false;
    }
    if is_all_uppercase(stripped) {
        return true;
    }

    let word_count = strip_punctuation(stripped).split_whitespace().count();
    (1..=MAX_HEADER_WORDS).contains(&word_count) && !stripped.contains('.')
}

/// Decimal digits in any script (`3`, `٣`), but not other numerics such as `½` or `Ⅳ`.
fn has_decimal_digit(text: &str) -> bool {
    match cached_regex(&DECIMAL_DIGIT, r"\p{Nd}") {
        Ok(re) => re.is_match(text),
        Err(_) => text.chars().any(|c| c.is_ascii_digit()),
    }
}

/// True when the line has at least one cased character and none of them are lowercase.
fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

/// Maps a header line to the first section whose keywords it contains, in section order.
pub fn classify_header(line: &str) -> Option<Section> {
    let normalized = strip_punctuation(line.trim()).to_lowercase();
    SECTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_phrase(&normalized, k)))
        .map(|(section, _)| *section)
}

/// Scan state threaded through the fold over lines.
#[derive(Default)]
struct SegmentState {
    sections: SectionMap,
    current: Option<Section>,
}

/// Segments normalized resume text into the four named sections.
///
/// Lines before the first recognized header are dropped. A header-looking line that matches no
/// section keyword keeps the previous section active and is itself discarded.
pub fn segment_sections(text: &str) -> SectionMap {
    let state = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(SegmentState::default(), |mut state, line| {
            if is_likely_section_header(line) {
                if let Some(section) = classify_header(line) {
                    state.current = Some(section);
                }
            } else if let Some(section) = state.current {
                state.sections.append_line(section, line);
            }
            state
        });

    state.sections
}

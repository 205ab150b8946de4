//! Text Chunker — splits long text into ordered, size-bounded segments for embedding.

use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::text::{cached_regex, collapse_whitespace};
use crate::errors::EngineError;

/// Chunk size used by the controller when nothing else is configured.
pub const DEFAULT_MAX_CHARS: usize = 300;

static SENTENCE_END: OnceLock<Regex> = OnceLock::new();

/// Splits `text` into chunks of at most `max_chars` characters.
///
/// Algorithm:
/// 1. Collapse whitespace and split into sentences after `.` `!` `?` followed by whitespace
/// 2. Greedily pack sentences into a chunk while it still fits (joined with one space)
/// 3. A sentence longer than `max_chars` flushes the pending chunk and is hard-sliced into
///    `max_chars`-sized pieces, ignoring word boundaries
pub fn chunk_text(text: &str, max_chars: usize) -> Result<Vec<String>, EngineError> {
    if max_chars == 0 {
        return Err(EngineError::InputValidation(
            "max_chars must be a positive integer.".to_string(),
        ));
    }

    let text = collapse_whitespace(text);
    if text.is_empty() {
        return Err(EngineError::EmptyInput(
            "Input text cannot be empty.".to_string(),
        ));
    }

    let sentences = split_sentences(&text)?;

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in sentences {
        let sentence = sentence.trim();
        let sentence_len = sentence.chars().count();

        if sentence_len > max_chars {
            if !current.is_empty() {
                chunks.push(current.trim().to_string());
                current.clear();
                current_len = 0;
            }
            chunks.extend(hard_split(sentence, max_chars));
            continue;
        }

        let separator = usize::from(!current.is_empty());
        if current_len + sentence_len + separator <= max_chars {
            if separator == 1 {
                current.push(' ');
            }
            current.push_str(sentence);
            current_len += sentence_len + separator;
        } else {
            chunks.push(current.trim().to_string());
            current = sentence.to_string();
            current_len = sentence_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.trim().to_string());
    }

    Ok(chunks)
}

/// Splits after sentence-terminal punctuation; the punctuation stays with its sentence.
fn split_sentences(text: &str) -> Result<Vec<&str>, EngineError> {
    let boundary = cached_regex(&SENTENCE_END, r"[.!?]\s+")
        .map_err(|e| EngineError::Chunking(format!("sentence boundary pattern: {e}")))?;

    let mut sentences = Vec::new();
    let mut start = 0;
    for m in boundary.find_iter(text) {
        // terminal punctuation is always a single ASCII byte
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    Ok(sentences)
}

fn hard_split(sentence: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = sentence.chars().collect();
    chars
        .chunks(max_chars)
        .map(|piece| piece.iter().collect::<String>().trim().to_string())
        .filter(|piece| !piece.is_empty())
        .collect()
}

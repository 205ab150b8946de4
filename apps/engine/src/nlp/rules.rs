//! RuleAnnotator — an offline annotator built from closed word lists and suffix heuristics.
//!
//! It is far cruder than a statistical tagger, but it needs no external service and produces the
//! same `Annotation` shape, which is all the engine depends on.

use std::collections::HashSet;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use super::{Annotation, Annotator, Entity, EntityLabel, NounChunk, PosTag, Token};
use crate::analysis::text::cached_regex;
use crate::errors::EngineError;

/// Words with a `.`, `+` or `#` inside or trailing (`node.js`, `c++`, `c#`), or single punctuation.
const TOKEN_PATTERN: &str = r"\w+(?:[.+#]\w+)*[+#]*|[^\w\s]";

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "and", "or", "but", "nor", "so", "yet",
    "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto", "over", "under",
    "through", "during", "before", "after", "between", "across", "within", "without", "via", "per",
    "as", "than", "i", "me", "my", "we", "our", "you", "your", "he", "she", "it", "its", "they",
    "them", "their", "is", "are", "was", "were", "be", "been", "being", "am", "have", "has",
    "had", "do", "does", "did", "will", "would", "should", "could", "may", "might", "must", "can",
    "not", "no", "all", "both", "each", "some", "any", "more", "most", "very", "also", "while",
    "using", "including", "etc",
];

const VERBS: &[&str] = &[
    "build", "built", "develop", "design", "lead", "led", "manage", "create", "implement",
    "deploy", "maintain", "write", "wrote", "drive", "drove", "own", "ship", "run", "ran",
    "mentor", "architect", "improve", "reduce", "increase", "optimize", "migrate", "launch",
    "automate", "collaborate", "deliver", "work", "worked", "use", "used", "make", "made",
    "develops", "builds", "leads", "manages", "designs", "creates",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["able", "ible", "ive", "ous", "ful", "less", "ical"];

const ADJECTIVES: &[&str] = &[
    "senior", "junior", "new", "large", "small", "high", "low", "scalable", "distributed",
    "real", "full", "end", "strong", "key", "multiple", "various", "cross", "modern",
];

/// Plural-looking words that are their own lemma.
const INVARIANT_NOUNS: &[&str] = &[
    "kubernetes", "series", "analytics", "statistics", "physics", "mathematics", "economics",
    "aws", "news",
];

const MONTHS: &[&str] = &[
    "jan", "january", "feb", "february", "mar", "march", "apr", "april", "may", "jun", "june",
    "jul", "july", "aug", "august", "sep", "sept", "september", "oct", "october", "nov",
    "november", "dec", "december",
];

const ORG_MARKERS: &[&str] = &[
    "inc", "llc", "ltd", "corp", "corporation", "company", "co", "gmbh", "technologies",
    "solutions", "labs", "systems", "university", "institute", "college", "school", "bank",
    "group", "foundation",
];

#[derive(Debug, Clone, Default)]
pub struct RuleAnnotator;

impl RuleAnnotator {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Result<Vec<&str>, EngineError> {
        let re = cached_regex(&TOKEN_RE, TOKEN_PATTERN)
            .map_err(|e| EngineError::Annotation(format!("tokenizer pattern: {e}")))?;
        Ok(re.find_iter(text).map(|m| m.as_str()).collect())
    }

    fn annotate_sync(text: &str) -> Result<Annotation, EngineError> {
        let raw = Self::tokenize(text)?;
        let tokens = tag_tokens(&raw);
        let entities = find_entities(&tokens);
        let noun_chunks = noun_chunks(&tokens);
        Ok(Annotation {
            tokens,
            entities,
            noun_chunks,
        })
    }
}

#[async_trait]
impl Annotator for RuleAnnotator {
    async fn annotate(&self, text: &str) -> Result<Annotation, EngineError> {
        Self::annotate_sync(text)
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tagging
// ────────────────────────────────────────────────────────────────────────────

fn tag_tokens(raw: &[&str]) -> Vec<Token> {
    let function_words: HashSet<&str> = FUNCTION_WORDS.iter().copied().collect();
    let verbs: HashSet<&str> = VERBS.iter().copied().collect();
    let adjectives: HashSet<&str> = ADJECTIVES.iter().copied().collect();

    let mut sentence_start = true;
    raw.iter()
        .map(|&text| {
            let lower = text.to_lowercase();
            let pos = if is_function_token(text, &lower, &function_words) {
                PosTag::Other
            } else if adjectives.contains(lower.as_str()) {
                PosTag::Adj
            } else if verbs.contains(lower.as_str()) || is_past_tense(&lower) {
                PosTag::Verb
            } else if has_adjective_suffix(&lower) {
                PosTag::Adj
            } else if !sentence_start && starts_uppercase(text) {
                PosTag::Propn
            } else {
                PosTag::Noun
            };

            let lemma = match pos {
                PosTag::Noun => singularize(&lower),
                _ => lower,
            };
            sentence_start = matches!(text, "." | "!" | "?" | ":" | "•" | "|");

            Token {
                text: text.to_string(),
                pos,
                lemma,
            }
        })
        .collect()
}

/// Punctuation, bare numbers and closed-class words.
fn is_function_token(text: &str, lower: &str, function_words: &HashSet<&str>) -> bool {
    !text.chars().any(char::is_alphanumeric)
        || text.chars().all(|c| c.is_ascii_digit())
        || function_words.contains(lower)
}

fn has_adjective_suffix(word: &str) -> bool {
    ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix))
}

fn is_past_tense(word: &str) -> bool {
    word.len() > 4 && word.ends_with("ed") && word.chars().all(char::is_alphabetic)
}

fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

/// `libraries` → `library`, `frameworks` → `framework`. Short words, `-as`/`-is`/`-os`/`-us`/`-ss`
/// endings (`pandas`, `apis`) and known invariant nouns are left alone.
fn singularize(word: &str) -> String {
    if INVARIANT_NOUNS.contains(&word) {
        return word.to_string();
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if word.len() >= 5 {
        if let Some(stem) = word.strip_suffix('s') {
            let keep = stem.chars().next_back().map_or(true, |c| "aiosu".contains(c));
            if !keep {
                return stem.to_string();
            }
        }
    }
    word.to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────────────────────────────────────

fn is_year(text: &str) -> bool {
    text.len() == 4
        && text.chars().all(|c| c.is_ascii_digit())
        && (text.starts_with("19") || text.starts_with("20"))
}

fn is_month(lower: &str) -> bool {
    MONTHS.contains(&lower)
}

/// DATE: a month name optionally followed by a year, or a bare year.
/// ORG: a run of capitalized tokens that contains an organization marker (`Inc`, `University`).
fn find_entities(tokens: &[Token]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let lower = token.text.to_lowercase();

        if is_month(&lower) && starts_uppercase(&token.text) {
            let mut text = token.text.clone();
            if let Some(next) = tokens.get(i + 1).filter(|t| is_year(&t.text)) {
                text = format!("{text} {}", next.text);
                i += 1;
            }
            entities.push(Entity {
                text,
                label: EntityLabel::Date,
            });
            i += 1;
            continue;
        }

        if is_year(&token.text) {
            entities.push(Entity {
                text: token.text.clone(),
                label: EntityLabel::Date,
            });
            i += 1;
            continue;
        }

        if starts_uppercase(&token.text) {
            let start = i;
            let mut end = i;
            while end < tokens.len() && is_org_part(&tokens[end].text) {
                end += 1;
            }
            let run = &tokens[start..end];
            if run
                .iter()
                .any(|t| ORG_MARKERS.contains(&t.text.to_lowercase().trim_end_matches('.')))
            {
                let text = run.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
                entities.push(Entity {
                    text,
                    label: EntityLabel::Org,
                });
            }
            i = end.max(i + 1);
            continue;
        }

        i += 1;
    }

    entities
}

fn is_org_part(text: &str) -> bool {
    starts_uppercase(text) || text == "of" || text == "&"
}

// ────────────────────────────────────────────────────────────────────────────
// Noun chunks
// ────────────────────────────────────────────────────────────────────────────

/// Maximal runs of adjectives and nouns that contain at least one noun.
fn noun_chunks(tokens: &[Token]) -> Vec<NounChunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<&Token> = Vec::new();

    let mut flush = |current: &mut Vec<&Token>| {
        if current
            .iter()
            .any(|t| matches!(t.pos, PosTag::Noun | PosTag::Propn))
        {
            chunks.push(NounChunk {
                lemmas: current.iter().map(|t| t.lemma.clone()).collect(),
            });
        }
        current.clear();
    };

    for token in tokens {
        if matches!(token.pos, PosTag::Noun | PosTag::Propn | PosTag::Adj) {
            current.push(token);
        } else {
            flush(&mut current);
        }
    }
    flush(&mut current);

    chunks
}

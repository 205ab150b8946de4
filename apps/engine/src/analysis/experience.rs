//! Experience Signal Extractor — years, quantified impact, leadership and deployment keywords.

use crate::models::ExperienceSignals;

const LEADERSHIP_KEYWORDS: &[&str] = &[
    "lead",
    "senior",
    "architect",
    "managed",
    "team lead",
    "mentored",
];

const DEPLOYMENT_KEYWORDS: &[&str] = &[
    "deployed",
    "production",
    "scalable",
    "performance",
    "optimized",
    "cloud",
];

/// Mines experience signals from the full resume text. Blank text yields `None` ("no signal"),
/// which is scored differently from an all-zero result.
pub fn extract_experience_signals(text: &str) -> Option<ExperienceSignals> {
    if text.trim().is_empty() {
        return None;
    }

    let lower = text.to_lowercase();

    Some(ExperienceSignals {
        years_experience: max_years(&lower),
        impact_mentions: count_u32(percent_mentions(&lower)),
        leadership_mentions: count_u32(keyword_hits(&lower, LEADERSHIP_KEYWORDS)),
        deployment_mentions: count_u32(keyword_hits(&lower, DEPLOYMENT_KEYWORDS)),
    })
}

/// Sum of non-overlapping substring counts. "team lead" also counts as a "lead".
fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().map(|k| text.matches(k).count()).sum()
}

/// Maximal ASCII digit runs with their byte span.
fn digit_runs(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let bytes = text.as_bytes();
    let mut i = 0;
    std::iter::from_fn(move || {
        while i < bytes.len() && !bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        Some((start, i))
    })
}

/// Largest `N` in `N years` / `N+ years` (whitespace required before "years"); 0 if none.
fn max_years(text: &str) -> u32 {
    digit_runs(text)
        .filter(|&(_, end)| is_years_suffix(&text[end..]))
        .filter_map(|(start, end)| text[start..end].parse::<u64>().ok())
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .max()
        .unwrap_or(0)
}

fn is_years_suffix(rest: &str) -> bool {
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let trimmed = rest.trim_start();
    trimmed.len() < rest.len() && trimmed.starts_with("years")
}

/// Digit runs immediately followed by `%`.
fn percent_mentions(text: &str) -> usize {
    digit_runs(text)
        .filter(|&(_, end)| text[end..].starts_with('%'))
        .count()
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_no_signal() {
        assert_eq!(extract_experience_signals(""), None);
        assert_eq!(extract_experience_signals(" \n "), None);
    }

    #[test]
    fn test_text_without_signals_is_all_zero_not_none() {
        assert_eq!(
            extract_experience_signals("Enjoys hiking."),
            Some(ExperienceSignals::default())
        );
    }

    #[test]
    fn test_years_takes_maximum() {
        let signals =
            extract_experience_signals("3 years of Go, 7+ years of Python, 10years nothing")
                .unwrap();
        assert_eq!(signals.years_experience, 7);
    }

    #[test]
    fn test_years_requires_whitespace() {
        assert_eq!(max_years("5+years"), 0);
        assert_eq!(max_years("5\tyears"), 5);
        assert_eq!(max_years("over 12  years"), 12);
    }

    #[test]
    fn test_impact_counts_percentages() {
        let signals =
            extract_experience_signals("Cut costs 20%, latency by 35 %, uptime 99.9%").unwrap();
        // "20%" and the "9%" tail of "99.9%"; "35 %" has a space
        assert_eq!(signals.impact_mentions, 2);
    }

    #[test]
    fn test_scenario_signals() {
        let text = "Senior engineer with 5 years in Python. Led the team lead rotation, \
                    deployed Python services to production and improved throughput by 20%.";
        let signals = extract_experience_signals(text).unwrap();
        assert_eq!(signals.years_experience, 5);
        assert_eq!(signals.impact_mentions, 1);
        // senior + lead (inside "team lead") + team lead
        assert!(signals.leadership_mentions >= 2);
        // deployed + production
        assert!(signals.deployment_mentions >= 2);
    }

    #[test]
    fn test_keyword_hits_counts_substrings() {
        assert_eq!(keyword_hits("team lead, lead architect", LEADERSHIP_KEYWORDS), 4);
        assert_eq!(keyword_hits("cloud cloud-native", DEPLOYMENT_KEYWORDS), 2);
    }
}

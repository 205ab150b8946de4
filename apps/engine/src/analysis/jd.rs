//! Job-description requirements used by the semantic scorer.

/// Generic software-engineering expectations used when no JD is supplied.
pub const DEFAULT_JD_REQUIREMENTS: [&str; 8] = [
    "Strong software engineering fundamentals and problem-solving ability",
    "Experience building scalable and maintainable applications",
    "Understanding of backend systems, APIs, and database design",
    "Familiarity with frontend frameworks and modern development tools",
    "Experience working with cloud platforms and deployment workflows",
    "Knowledge of data processing or machine learning concepts is a plus",
    "Ability to write clean, efficient, and production-ready code",
    "Understanding of system architecture, performance optimization, and security best practices",
];

pub fn default_jd_requirements() -> Vec<String> {
    DEFAULT_JD_REQUIREMENTS.iter().map(|s| s.to_string()).collect()
}

/// A supplied JD becomes one requirement (newlines flattened, trimmed); a missing or blank JD
/// falls back to the default list.
pub fn resolve_jd_requirements(jd_text: Option<&str>) -> Vec<String> {
    let normalized = jd_text
        .map(|text| text.replace('\n', " ").trim().to_string())
        .filter(|text| !text.is_empty());

    match normalized {
        Some(text) => vec![text],
        None => default_jd_requirements(),
    }
}

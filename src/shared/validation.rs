use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for airport identifiers (ICAO or FAA local codes)
    /// - Valid: "KTEB", "3N6", "N07", "kteb"
    /// - Invalid: "K", "KTEB1", "K-TB", "K TB"
    pub static ref AIRPORT_CODE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9]{3,4}$").unwrap();

    /// Regex for aircraft registration marks as typed by users
    /// Letters, digits and at most one hyphen between them
    /// - Valid: "N12345", "n172sp", "C-GABC"
    /// - Invalid: "-N123", "N 123", "N--1"
    pub static ref TAIL_NUMBER_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)?$").unwrap();
}

/// Trim each tag, drop blanks and duplicates while keeping first-seen order
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() || normalized.iter().any(|t| t == tag) {
            continue;
        }
        normalized.push(tag.to_string());
    }
    normalized
}

/// Split a comma-separated query value into normalized tags
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(value) => normalize_tags(value.split(',').map(str::to_string).collect()),
        None => Vec::new(),
    }
}

/// Turn whitespace-only optional text into `None`
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

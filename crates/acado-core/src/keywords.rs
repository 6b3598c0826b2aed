//! Keyword normalization.
//!
//! Resources carry free-text tags that users type as a comma-separated list.
//! Storage keeps them as one canonical string: lower-cased, trimmed,
//! deduplicated, joined with `,`. An empty set is stored as a missing field,
//! so [`format_keywords`] returns `None` rather than `""`.
//!
//! ```
//! use acado_core::keywords::{format_keywords, parse_keywords};
//!
//! assert_eq!(
//!     format_keywords(["math", "Math", "  science "]),
//!     Some("math,science".to_string())
//! );
//! assert_eq!(parse_keywords(Some("Math, Science")), vec!["math", "science"]);
//! assert_eq!(parse_keywords(None), Vec::<String>::new());
//! ```

/// Separator used in the stored form.
pub const SEPARATOR: char = ',';

/// Split a stored or user-typed keyword string into display form.
///
/// Each segment is trimmed and lower-cased; empty segments are dropped.
/// Order is kept and duplicates are *not* removed.
pub fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split(SEPARATOR)
        .map(|segment| segment.trim().to_lowercase())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Normalize a keyword list into its stored form.
///
/// Entries are trimmed and lower-cased, empty entries are dropped, and
/// duplicates are removed keeping the first occurrence. An entry that itself
/// contains a separator contributes each of its segments. Returns `None`
/// when nothing is left.
pub fn format_keywords<I, S>(keywords: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for keyword in keywords {
        for normalized in parse_keywords(Some(keyword.as_ref())) {
            if !unique.contains(&normalized) {
                unique.push(normalized);
            }
        }
    }

    if unique.is_empty() {
        None
    } else {
        Some(unique.join(","))
    }
}

/// Re-normalize an already stored keyword string.
///
/// Useful when reading documents written by older clients that did not
/// deduplicate.
pub fn normalize_stored(raw: Option<&str>) -> Option<String> {
    format_keywords(parse_keywords(raw))
}

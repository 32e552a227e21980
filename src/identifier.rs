//! Header normalization: free-text column headers become unique,
//! warehouse-legal identifiers.
//!
//! `normalize` is total: any input string, including empty or
//! all-punctuation headers, produces a non-empty identifier matching
//! `[a-z0-9_]+` that never starts with a digit. `dedupe` then enforces
//! uniqueness across one file's ordered header list.

use std::collections::HashMap;

use deunicode::deunicode;

/// Identifier emitted when a header slugifies to nothing.
pub const EMPTY_HEADER_PLACEHOLDER: &str = "column";

/// Converts a raw header into a lowercase, underscore-separated identifier.
///
/// Unicode letters are transliterated to their closest ASCII equivalent
/// before separator substitution, so `Café Münü` becomes `cafe_munu`. Runs
/// of non-alphanumeric characters collapse to a single underscore, and
/// leading or trailing separators are dropped. Identifiers that would start
/// with a digit get an `x` prefix to stay legal in the warehouse.
pub fn normalize(raw: &str) -> String {
    let ascii = deunicode(raw);
    let mut slug = String::with_capacity(ascii.len());
    let mut gap = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('_');
            }
            gap = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    if slug.is_empty() {
        return EMPTY_HEADER_PLACEHOLDER.to_string();
    }
    if slug.as_bytes()[0].is_ascii_digit() {
        slug.insert(0, 'x');
    }
    slug
}

/// Makes an ordered identifier list unique by suffixing repeats.
///
/// The Nth occurrence of the same input value is emitted as `<value>N`
/// (`name`, `name2`, `name3`, ...). Suffixed forms are not re-checked
/// against later literal duplicates, so `name, name, name2` still yields a
/// repeated `name2`.
pub fn dedupe(identifiers: Vec<String>) -> Vec<String> {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let mut unique = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        let count = occurrences.entry(identifier.clone()).or_insert(0);
        *count += 1;
        let seen = *count;
        if seen == 1 {
            unique.push(identifier);
        } else {
            unique.push(format!("{identifier}{seen}"));
        }
    }
    unique
}

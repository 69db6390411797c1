//! Small string helpers shared by the adapters.

use std::collections::HashSet;

use regex::Regex;

/// Lowercased whitespace-separated words of `text`.
pub(crate) fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of `terms` occurring in `text`, case-insensitively.
pub(crate) fn count_terms_ci<S: AsRef<str>>(text: &str, terms: &[S]) -> usize {
    let lowered = text.to_lowercase();
    terms
        .iter()
        .filter(|t| {
            let t = t.as_ref();
            !t.is_empty() && lowered.contains(&t.to_lowercase())
        })
        .count()
}

/// Whether any of `terms` occurs in `text`, case-insensitively.
pub(crate) fn contains_any_ci(text: &str, terms: &[&str]) -> bool {
    count_terms_ci(text, terms) > 0
}

/// Case-insensitive matcher for any of `terms` as whole words or phrases.
///
/// Plain terms also match their `s`/`es` plural. A term ending in `*` is a
/// stem and matches any word that starts with it (`"allerg*"` matches
/// "allergy" and "allergic"). An empty list matches nothing.
pub(crate) fn word_matcher(terms: &[&str]) -> Regex {
    if terms.is_empty() {
        return Regex::new(r"[^\s\S]").expect("valid regex");
    }
    let alternation = terms
        .iter()
        .map(|term| match term.strip_suffix('*') {
            Some(stem) => format!(r"{}\w*", regex::escape(stem)),
            None => format!("{}(?:s|es)?", regex::escape(term)),
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("valid regex")
}

/// Drop repeated entries (first occurrence wins) and keep at most `cap`.
pub(crate) fn dedup_truncate(items: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .take(cap)
        .collect()
}

//! Reasoning steps recovered from the structure of a generated answer.

use std::sync::LazyLock;

use regex::Regex;

/// A numbered (`1.`, `2)`) or bulleted (`-`, `*`, `•`) line.
static STEP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\d{1,2}[.)]|[-*•])[ \t]+(\S.*?)[ \t\r]*$").expect("valid regex")
});

/// Collect the numbered or bulleted lines of `answer` as reasoning steps,
/// markers stripped, in order. Prose without list structure yields none.
pub fn extract_reasoning_steps(answer: &str) -> Vec<String> {
    STEP_LINE
        .captures_iter(answer)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_and_bulleted_lines_become_steps() {
        let answer = "Fever usually resolves on its own.\n\
                      1. Rest and drink fluids\n\
                      2) Track your temperature  \n\
                      - See a doctor if it lasts more than three days\n\
                      That covers the basics.";
        assert_eq!(
            extract_reasoning_steps(answer),
            vec![
                "Rest and drink fluids",
                "Track your temperature",
                "See a doctor if it lasts more than three days",
            ]
        );
    }

    #[test]
    fn prose_has_no_steps() {
        let prose = "A raised body temperature. Version 2.0 helps.";
        assert!(extract_reasoning_steps(prose).is_empty());
        assert!(extract_reasoning_steps("").is_empty());
        assert!(extract_reasoning_steps("-\n1.").is_empty());
    }
}

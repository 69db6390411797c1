//! Answer quality issues.
//!
//! Issues are informational: they are reported to the caller and never abort
//! the pipeline.

use serde::{Deserialize, Serialize};

/// A named problem found while validating an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityIssue {
    /// The answer is shorter than the minimum length.
    TooShort,
    /// None of the domain's key concepts appear in the answer.
    LacksDomainVocabulary,
    /// The answer shares too few words with the question.
    LowRelevance,
    /// The answer contains advice the domain forbids (e.g. prescribing).
    InappropriateAdvice,
    /// A long answer carries no disclaimer.
    MissingDisclaimer,
    /// The question used domain terms that the answer never addresses.
    InsufficientTerminology,
}

impl QualityIssue {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::LacksDomainVocabulary => "lacks_domain_vocabulary",
            Self::LowRelevance => "low_relevance",
            Self::InappropriateAdvice => "inappropriate_advice",
            Self::MissingDisclaimer => "missing_disclaimer",
            Self::InsufficientTerminology => "insufficient_terminology",
        }
    }
}

impl std::fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::TooShort => "answer is too short",
            Self::LacksDomainVocabulary => "answer lacks domain vocabulary",
            Self::LowRelevance => "answer is not relevant enough to the question",
            Self::InappropriateAdvice => "answer contains inappropriate advice",
            Self::MissingDisclaimer => "answer is missing a disclaimer",
            Self::InsufficientTerminology => {
                "answer does not use the domain terms from the question"
            }
        };
        f.write_str(msg)
    }
}

/// Outcome of answer validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub passed: bool,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// Build a report that passes exactly when `issues` is empty.
    pub fn from_issues(issues: Vec<QualityIssue>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
        }
    }

    /// Append domain-specific issues, AND-ing their verdict into this report.
    pub fn merge(mut self, extra: QualityReport) -> Self {
        self.passed = self.passed && extra.passed;
        self.issues.extend(extra.issues);
        self
    }

    pub fn has(&self, issue: QualityIssue) -> bool {
        self.issues.contains(&issue)
    }
}

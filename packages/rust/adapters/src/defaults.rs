//! Domain-agnostic default behavior for every [`DomainAdapter`] hook.
//!
//! These are free functions so that adapters overriding a hook can still run
//! the shared step explicitly before extending it.

use domainqa_shared::{AnswerResult, QualityIssue, QualityReport, clamp_confidence};

use crate::adapter::DomainAdapter;
use crate::knowledge::DomainKnowledge;
use crate::text::{count_terms_ci, dedup_truncate, word_set};

/// Answers shorter than this (trimmed, in chars) are flagged as too short.
pub const MIN_ANSWER_CHARS: usize = 20;

/// Relevance requires strictly more than this share of question words in the answer.
pub const RELEVANCE_THRESHOLD: f64 = 0.2;

/// Maximum bonus from key concepts, reached at [`CONCEPT_MATCH_CAP`] matches.
pub const CONCEPT_BONUS: f64 = 0.1;

pub const CONCEPT_MATCH_CAP: usize = 3;

/// Flat bonus per quality indicator found in the answer.
pub const QUALITY_INDICATOR_BONUS: f64 = 0.05;

pub const BASE_SUGGESTION_CAP: usize = 5;

/// A common question is related when it shares at least this many words.
pub const MIN_SHARED_WORDS: usize = 2;

/// Apply the terminology map to `question`.
pub fn preprocess_question(knowledge: &DomainKnowledge, question: &str) -> String {
    knowledge.terminology.apply(question)
}

/// Recompute `answer.confidence` through the adapter's confidence hook.
/// Only the confidence changes.
pub fn post_process_answer<A: DomainAdapter + ?Sized>(adapter: &A, answer: &mut AnswerResult) {
    let adjusted = adapter.adjust_confidence(answer.confidence, &answer.answer);
    tracing::debug!(
        parent: adapter.span(),
        before = answer.confidence,
        after = adjusted,
        "confidence adjusted"
    );
    answer.set_confidence(adjusted);
}

/// Concept bonus (capped at three matches) plus an uncapped per-indicator
/// bonus, clamped once at the end.
pub fn adjust_confidence(knowledge: &DomainKnowledge, base: f64, answer: &str) -> f64 {
    let concepts = count_terms_ci(answer, &knowledge.key_concepts).min(CONCEPT_MATCH_CAP);
    let concept_bonus = CONCEPT_BONUS * concepts as f64 / CONCEPT_MATCH_CAP as f64;

    let indicators = count_terms_ci(answer, &knowledge.quality_indicators);
    let indicator_bonus = QUALITY_INDICATOR_BONUS * indicators as f64;

    clamp_confidence(base + concept_bonus + indicator_bonus)
}

/// Length, vocabulary, and relevance checks.
pub fn validate_answer_quality<A: DomainAdapter + ?Sized>(
    adapter: &A,
    answer: &str,
    question: &str,
) -> QualityReport {
    let mut issues = Vec::new();

    if answer.trim().chars().count() < MIN_ANSWER_CHARS {
        issues.push(QualityIssue::TooShort);
    }

    if count_terms_ci(answer, &adapter.knowledge().key_concepts) == 0 {
        issues.push(QualityIssue::LacksDomainVocabulary);
    }

    if !adapter.is_relevant(answer, question) {
        issues.push(QualityIssue::LowRelevance);
    }

    QualityReport::from_issues(issues)
}

/// Share of distinct question words that also appear in the answer must
/// exceed [`RELEVANCE_THRESHOLD`]. A question without words is never relevant.
pub fn is_relevant(answer: &str, question: &str) -> bool {
    let question_words = word_set(question);
    if question_words.is_empty() {
        return false;
    }
    let answer_words = word_set(answer);
    let overlap = question_words.intersection(&answer_words).count();
    overlap as f64 / question_words.len() as f64 > RELEVANCE_THRESHOLD
}

/// Common questions sharing at least [`MIN_SHARED_WORDS`] words with `question`,
/// in knowledge order, at most [`BASE_SUGGESTION_CAP`].
pub fn suggest_related_questions(knowledge: &DomainKnowledge, question: &str) -> Vec<String> {
    let question_words = word_set(question);
    let related = knowledge
        .common_questions
        .iter()
        .filter(|common| word_set(common).intersection(&question_words).count() >= MIN_SHARED_WORDS)
        .cloned()
        .collect();
    dedup_truncate(related, BASE_SUGGESTION_CAP)
}

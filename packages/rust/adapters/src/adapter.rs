//! The domain adapter contract.
//!
//! A [`DomainAdapter`] customizes the question-answering pipeline for one subject
//! domain. Every hook except [`DomainAdapter::build_system_prompt`] and
//! [`DomainAdapter::matches`] has a domain-agnostic default in [`crate::defaults`].
//! Adapters that override a hook call the matching `defaults::` function first
//! and then add their own behavior on top.

use serde_json::{Map, Value};
use tracing::Span;

use domainqa_shared::{
    AnswerResult, DomainInfo, QualityReport, QuestionContext, Result, SearchResult,
};

use crate::defaults;
use crate::knowledge::DomainKnowledge;

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Options applied when an adapter is constructed.
#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    /// Reject terminology maps with overlapping keys.
    pub strict_terminology: bool,
}

/// Validated knowledge plus the adapter's own logging span.
#[derive(Debug)]
pub struct AdapterCore {
    knowledge: DomainKnowledge,
    span: Span,
}

impl AdapterCore {
    /// Validate `knowledge` and open a span scoped to this adapter instance.
    pub fn new(knowledge: DomainKnowledge, options: &AdapterOptions) -> Result<Self> {
        knowledge.validate(options.strict_terminology)?;
        let span = tracing::info_span!("domain_adapter", domain = %knowledge.domain_name);
        span.in_scope(|| {
            tracing::debug!(
                concepts = knowledge.key_concepts.len(),
                terms = knowledge.terminology.len(),
                "adapter initialized"
            );
        });
        Ok(Self { knowledge, span })
    }

    pub fn knowledge(&self) -> &DomainKnowledge {
        &self.knowledge
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Trait for domain-specific question-answering behavior.
///
/// All hooks are synchronous, pure over their inputs, and safe to call
/// concurrently: the only adapter state is its immutable [`DomainKnowledge`].
pub trait DomainAdapter: Send + Sync {
    /// Build this adapter's knowledge record. Called once, by the constructor.
    fn init_knowledge() -> DomainKnowledge
    where
        Self: Sized;

    /// The knowledge record built at construction.
    fn knowledge(&self) -> &DomainKnowledge;

    /// Span that scopes this adapter's log events.
    fn span(&self) -> &Span;

    /// Registry key for this adapter.
    fn name(&self) -> &str {
        &self.knowledge().domain_name
    }

    /// Whether this adapter should handle `question` when no domain tag is given.
    fn matches(&self, question: &str) -> bool;

    /// Instruction text for the generation step. Never empty.
    fn build_system_prompt(&self, question: &str) -> String;

    /// Normalize the question before retrieval and generation.
    fn preprocess_question(&self, question: &str) -> String {
        defaults::preprocess_question(self.knowledge(), question)
    }

    /// Adjust the generated answer in place.
    fn post_process_answer(
        &self,
        answer: &mut AnswerResult,
        _context: &QuestionContext,
        _knowledge: &[SearchResult],
    ) {
        defaults::post_process_answer(self, answer);
    }

    /// Domain-adjusted confidence, always within `[0.0, 1.0]`.
    fn adjust_confidence(&self, base: f64, answer: &str) -> f64 {
        defaults::adjust_confidence(self.knowledge(), base, answer)
    }

    /// Check the answer for quality issues.
    fn validate_answer_quality(&self, answer: &str, question: &str) -> QualityReport {
        defaults::validate_answer_quality(self, answer, question)
    }

    /// Word-overlap relevance between answer and question.
    fn is_relevant(&self, answer: &str, question: &str) -> bool {
        defaults::is_relevant(answer, question)
    }

    /// Maximum number of related questions this adapter returns.
    fn suggestion_cap(&self) -> usize {
        defaults::BASE_SUGGESTION_CAP
    }

    /// Related questions, deduplicated, at most [`Self::suggestion_cap`] entries.
    fn suggest_related_questions(&self, question: &str) -> Vec<String> {
        defaults::suggest_related_questions(self.knowledge(), question)
    }

    /// Domain-specific labels for `question`, such as a topic or risk flags.
    /// Adapters without a classifier return an empty map.
    fn classify(&self, _question: &str) -> Map<String, Value> {
        Map::new()
    }

    /// Summary counts for this adapter's knowledge.
    fn domain_info(&self) -> DomainInfo {
        self.knowledge().info()
    }
}

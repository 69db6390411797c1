//! End-to-end answer pipeline: select → preprocess → prompt → generate →
//! postprocess → engine checks → validate → suggest.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{Span, debug, info, instrument};

use domainqa_adapters::AdapterRegistry;
use domainqa_shared::{
    AnswerResult, PipelineConfig, QualityReport, QuestionContext, RequestId, Result,
};

use crate::checks::{EnginePenalty, apply_engine_checks};
use crate::reasoning::extract_reasoning_steps;
use crate::service::{AnswerService, GenerationRequest};

/// Result of answering one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub request_id: RequestId,
    /// Registry key of the adapter that handled the question.
    pub domain: String,
    pub processed_question: String,
    pub system_prompt: String,
    pub answer: AnswerResult,
    /// Number of knowledge snippets the answer was grounded on.
    pub knowledge_count: usize,
    #[serde(default)]
    pub penalties: Vec<EnginePenalty>,
    pub quality: QualityReport,
    #[serde(default)]
    pub related_questions: Vec<String>,
    pub elapsed_ms: u64,
    /// Set when the question could not be answered (batch mode only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each question finishes (successfully or not).
    fn question_done(&self, domain: &str, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn question_done(&self, _domain: &str, _current: usize, _total: usize) {}
}

/// Answer one question.
///
/// 1. Select the adapter (tag, detection, default domain)
/// 2. Normalize the question and build the system prompt
/// 3. Call the answer service; fill missing citations and reasoning steps
/// 4. Adapter postprocessing, then engine checks
/// 5. Validate the final answer against the original question
/// 6. Suggest related questions
///
/// A service failure is returned as-is; no adapter stage runs after it.
#[instrument(skip_all, fields(request_id = %context.id, domain = tracing::field::Empty))]
pub async fn answer_question(
    registry: &AdapterRegistry,
    service: &dyn AnswerService,
    context: &QuestionContext,
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<PipelineOutcome> {
    let start = Instant::now();

    progress.phase("Selecting domain");
    let adapter = registry.select(context)?;
    let domain = adapter.name().to_string();
    Span::current().record("domain", domain.as_str());

    progress.phase("Preparing prompt");
    let processed_question = adapter.preprocess_question(&context.question);
    let system_prompt = adapter.build_system_prompt(&context.question);
    debug!(%domain, processed = %processed_question, "question prepared");

    progress.phase("Generating answer");
    let request = GenerationRequest {
        domain: domain.clone(),
        processed_question: processed_question.clone(),
        system_prompt: system_prompt.clone(),
        context: context.clone(),
    };
    let generation = service.generate(&request).await?;
    let mut answer = generation.answer;
    let knowledge = generation.knowledge;

    if answer.sources.is_empty() {
        answer.sources = knowledge.iter().map(|hit| hit.citation()).collect();
    }
    if answer.reasoning_steps.is_empty() {
        answer.reasoning_steps = extract_reasoning_steps(&answer.answer);
    }

    progress.phase("Reviewing answer");
    adapter.post_process_answer(&mut answer, context, &knowledge);
    let penalties = apply_engine_checks(&mut answer, &config.engine);
    let quality = adapter.validate_answer_quality(&answer.answer, &context.question);
    let related_questions = adapter.suggest_related_questions(&context.question);

    let outcome = PipelineOutcome {
        request_id: context.id.clone(),
        domain,
        processed_question,
        system_prompt,
        answer,
        knowledge_count: knowledge.len(),
        penalties,
        quality,
        related_questions,
        elapsed_ms: start.elapsed().as_millis() as u64,
        error: None,
    };

    info!(
        domain = %outcome.domain,
        confidence = outcome.answer.confidence,
        passed = outcome.quality.passed,
        issues = outcome.quality.issues.len(),
        elapsed_ms = outcome.elapsed_ms,
        "question answered"
    );

    Ok(outcome)
}

//! Bounded-concurrency batch answering.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use domainqa_adapters::AdapterRegistry;
use domainqa_shared::{
    AnswerResult, DomainQaError, PipelineConfig, QualityReport, QuestionContext, Result,
};

use crate::pipeline::{PipelineOutcome, ProgressReporter, SilentProgress, answer_question};
use crate::service::AnswerService;

/// Answer text used for questions that failed inside a batch.
pub const FALLBACK_ANSWER: &str =
    "An error occurred while processing this question in the batch. Please try again.";

/// Answer every context with at most `config.batch_concurrency` in flight.
///
/// Outcomes come back in input order. A question that fails (service error,
/// no adapter, panicked task) yields [`fallback_outcome`] instead of failing
/// the whole batch.
#[instrument(skip_all, fields(questions = contexts.len()))]
pub async fn answer_batch(
    registry: Arc<AdapterRegistry>,
    service: Arc<dyn AnswerService>,
    contexts: Vec<QuestionContext>,
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Vec<PipelineOutcome> {
    let total = contexts.len();
    let semaphore = Arc::new(Semaphore::new(config.batch_concurrency.max(1) as usize));
    let shared_config = Arc::new(config.clone());

    info!(
        total,
        concurrency = config.batch_concurrency,
        "starting batch"
    );
    progress.phase("Answering questions");

    let mut handles = Vec::with_capacity(total);
    for context in contexts {
        let registry = registry.clone();
        let service = service.clone();
        let sem = semaphore.clone();
        let config = shared_config.clone();
        let fallback_ctx = context.clone();

        let handle = tokio::spawn(answer_one(registry, service, sem, config, context));
        handles.push((fallback_ctx, handle));
    }

    let mut outcomes = Vec::with_capacity(total);
    let mut failed = 0usize;
    for (i, (context, handle)) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(request_id = %context.id, error = %e, "question failed");
                failed += 1;
                fallback_outcome(&context, &e.to_string())
            }
            Err(e) => {
                warn!(request_id = %context.id, error = %e, "task failed");
                failed += 1;
                fallback_outcome(&context, &e.to_string())
            }
        };
        progress.question_done(&outcome.domain, i + 1, total);
        outcomes.push(outcome);
    }

    info!(total, failed, "batch complete");
    outcomes
}

async fn answer_one(
    registry: Arc<AdapterRegistry>,
    service: Arc<dyn AnswerService>,
    semaphore: Arc<Semaphore>,
    config: Arc<PipelineConfig>,
    context: QuestionContext,
) -> Result<PipelineOutcome> {
    let _permit = semaphore
        .acquire()
        .await
        .map_err(|e| DomainQaError::Generation(format!("semaphore closed: {e}")))?;
    answer_question(&registry, service.as_ref(), &context, &config, &SilentProgress).await
}

/// Zero-confidence outcome standing in for a failed question.
pub fn fallback_outcome(context: &QuestionContext, error: &str) -> PipelineOutcome {
    PipelineOutcome {
        request_id: context.id.clone(),
        domain: context.domain.clone().unwrap_or_default(),
        processed_question: context.question.clone(),
        system_prompt: String::new(),
        answer: AnswerResult::new(FALLBACK_ANSWER, 0.0),
        knowledge_count: 0,
        penalties: Vec::new(),
        quality: QualityReport {
            passed: false,
            issues: Vec::new(),
        },
        related_questions: Vec::new(),
        elapsed_ms: 0,
        error: Some(error.to_string()),
    }
}

/// Convenience wrapper returning an error only when the batch itself is empty.
pub async fn answer_batch_nonempty(
    registry: Arc<AdapterRegistry>,
    service: Arc<dyn AnswerService>,
    contexts: Vec<QuestionContext>,
    config: &PipelineConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<PipelineOutcome>> {
    if contexts.is_empty() {
        return Err(DomainQaError::validation("batch contains no questions"));
    }
    Ok(answer_batch(registry, service, contexts, config, progress).await)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::service::{Generation, GenerationRequest};

    /// Answers with the question text after a short delay, failing on "boom".
    /// Tracks the peak number of concurrent calls.
    #[derive(Default)]
    struct EchoService {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl AnswerService for EchoService {
        async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if request.context.question.contains("boom") {
                return Err(DomainQaError::Generation("backend exploded".into()));
            }
            Ok(Generation {
                answer: AnswerResult::new(format!("Answer to: {}", request.context.question), 0.5),
                knowledge: vec![],
            })
        }
    }

    fn registry() -> Arc<AdapterRegistry> {
        Arc::new(AdapterRegistry::new().expect("builtin adapters"))
    }

    #[tokio::test]
    async fn preserves_input_order_and_bounds_concurrency() {
        let service = Arc::new(EchoService::default());
        let contexts: Vec<_> = (0..8)
            .map(|i| QuestionContext::new(format!("question number {i}")))
            .collect();
        let ids: Vec<_> = contexts.iter().map(|c| c.id.clone()).collect();
        let config = PipelineConfig {
            batch_concurrency: 2,
            ..PipelineConfig::default()
        };

        let outcomes = answer_batch(
            registry(),
            service.clone(),
            contexts,
            &config,
            &SilentProgress,
        )
        .await;

        assert_eq!(outcomes.len(), 8);
        for (i, (outcome, id)) in outcomes.iter().zip(&ids).enumerate() {
            assert_eq!(&outcome.request_id, id);
            assert!(outcome.answer.answer.starts_with(&format!("Answer to: question number {i}")));
        }
        assert!(service.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn failure_yields_fallback_not_batch_error() {
        let contexts = vec![
            QuestionContext::new("first question"),
            QuestionContext::new("boom goes this one"),
            QuestionContext::new("third question"),
        ];

        let outcomes = answer_batch(
            registry(),
            Arc::new(EchoService::default()),
            contexts,
            &PipelineConfig::default(),
            &SilentProgress,
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].error.is_none());
        assert_eq!(outcomes[1].answer.answer, FALLBACK_ANSWER);
        assert_eq!(outcomes[1].answer.confidence, 0.0);
        assert!(!outcomes[1].quality.passed);
        assert!(outcomes[1].error.as_deref().unwrap().contains("backend exploded"));
        assert!(outcomes[2].error.is_none());
    }

    #[tokio::test]
    async fn empty_batch_rejected_by_wrapper() {
        let err = answer_batch_nonempty(
            registry(),
            Arc::new(EchoService::default()),
            vec![],
            &PipelineConfig::default(),
            &SilentProgress,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainQaError::Validation { .. }));
    }
}

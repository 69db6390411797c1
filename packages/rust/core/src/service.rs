//! Answer service port.
//!
//! Retrieval and generation live outside this workspace. The pipeline talks to
//! them through [`AnswerService`]; [`DraftAnswerService`] stands in for a real
//! backend by replaying answers supplied up front.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;

use domainqa_shared::{
    AnswerResult, DomainQaError, QuestionContext, RequestId, Result, SearchResult,
};

/// Base confidence for drafts that do not state one.
pub const DEFAULT_DRAFT_CONFIDENCE: f64 = 0.5;

/// Everything the generation backend needs for one question.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Registry key of the selected adapter.
    pub domain: String,
    /// Question after terminology normalization.
    pub processed_question: String,
    pub system_prompt: String,
    pub context: QuestionContext,
}

/// Raw backend output, before any adapter postprocessing.
#[derive(Debug, Clone)]
pub struct Generation {
    pub answer: AnswerResult,
    /// Knowledge the answer was grounded on, best match first.
    pub knowledge: Vec<SearchResult>,
}

/// Port to the external retrieval + generation backend.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Produce an answer for the request. Failures surface as
    /// [`DomainQaError::Generation`].
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation>;
}

// ---------------------------------------------------------------------------
// Draft answers
// ---------------------------------------------------------------------------

/// A pre-written answer for one question.
#[derive(Debug, Clone, Deserialize)]
pub struct Draft {
    pub answer: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub knowledge: Vec<SearchResult>,
}

fn default_confidence() -> f64 {
    DEFAULT_DRAFT_CONFIDENCE
}

impl Draft {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            confidence: DEFAULT_DRAFT_CONFIDENCE,
            knowledge: Vec::new(),
        }
    }
}

/// Serves drafts keyed by request id.
#[derive(Debug, Default)]
pub struct DraftAnswerService {
    drafts: HashMap<RequestId, Draft>,
}

impl DraftAnswerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the draft answer for request `id`, replacing any earlier one.
    pub fn insert(&mut self, id: RequestId, draft: Draft) {
        self.drafts.insert(id, draft);
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}

#[async_trait]
impl AnswerService for DraftAnswerService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let draft = self.drafts.get(&request.context.id).ok_or_else(|| {
            DomainQaError::Generation(format!("no draft answer for request {}", request.context.id))
        })?;

        let mut answer = AnswerResult::new(draft.answer.clone(), draft.confidence);
        answer.model_used = "draft".into();
        Ok(Generation {
            answer,
            knowledge: draft.knowledge.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(context: QuestionContext) -> GenerationRequest {
        GenerationRequest {
            domain: "general".into(),
            processed_question: context.question.clone(),
            system_prompt: "prompt".into(),
            context,
        }
    }

    #[tokio::test]
    async fn replays_registered_draft() {
        let ctx = QuestionContext::new("What is a fever?");
        let mut service = DraftAnswerService::new();
        service.insert(ctx.id.clone(), Draft::new("A raised body temperature."));

        let generation = service.generate(&request(ctx)).await.unwrap();
        assert_eq!(generation.answer.answer, "A raised body temperature.");
        assert_eq!(generation.answer.confidence, DEFAULT_DRAFT_CONFIDENCE);
        assert_eq!(generation.answer.model_used, "draft");
        assert!(generation.knowledge.is_empty());
    }

    #[tokio::test]
    async fn unknown_request_is_generation_error() {
        let service = DraftAnswerService::new();
        let err = service
            .generate(&request(QuestionContext::new("anything")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainQaError::Generation(_)));
    }

    #[test]
    fn draft_deserializes_with_defaults() {
        let draft: Draft = serde_json::from_str(r#"{"answer": "Rest and fluids."}"#).unwrap();
        assert_eq!(draft.confidence, DEFAULT_DRAFT_CONFIDENCE);
        assert!(draft.knowledge.is_empty());
    }
}

//! Question-answering pipeline orchestration for domainqa.
//!
//! This crate ties the adapter registry to an external [`AnswerService`] and
//! runs questions end to end, one at a time ([`answer_question`]) or as a
//! bounded-concurrency batch ([`answer_batch`]).

pub mod batch;
pub mod checks;
pub mod pipeline;
pub mod reasoning;
pub mod service;

pub use batch::{FALLBACK_ANSWER, answer_batch, answer_batch_nonempty, fallback_outcome};
pub use checks::{EnginePenalty, apply_engine_checks};
pub use pipeline::{PipelineOutcome, ProgressReporter, SilentProgress, answer_question};
pub use reasoning::extract_reasoning_steps;
pub use service::{
    AnswerService, DEFAULT_DRAFT_CONFIDENCE, Draft, DraftAnswerService, Generation,
    GenerationRequest,
};

//! Shared types, error model, and configuration for domainqa.
//!
//! This crate is the foundation depended on by all other domainqa crates.
//! It provides:
//! - [`DomainQaError`]: the unified error type
//! - Request/answer types ([`QuestionContext`], [`AnswerResult`], [`SearchResult`])
//! - Quality reporting ([`QualityIssue`], [`QualityReport`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)

pub mod config;
pub mod error;
pub mod quality;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AdaptersConfig, AppConfig, DefaultsConfig, EngineConfig, PipelineConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{DomainQaError, Result};
pub use quality::{QualityIssue, QualityReport};
pub use types::{
    AnswerResult, ConversationTurn, DomainInfo, KnowledgeChunk, QuestionContext, RequestId,
    SearchResult, SourceCitation, clamp_confidence,
};

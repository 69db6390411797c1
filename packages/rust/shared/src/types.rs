//! Request, answer, and retrieval types shared by the adapters and the pipeline.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying a single question (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Generate a new time-sortable request identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Confidence
// ---------------------------------------------------------------------------

/// Clamp a confidence score into `[0.0, 1.0]`. NaN maps to `0.0`.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// QuestionContext
// ---------------------------------------------------------------------------

/// One prior exchange in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

/// An incoming question plus session metadata. Read-only for adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionContext {
    /// Request identifier, used for log correlation.
    #[serde(default)]
    pub id: RequestId,
    /// The original question text.
    pub question: String,
    /// Explicit domain tag; when set it takes priority over detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<ConversationTurn>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub additional_context: serde_json::Map<String, serde_json::Value>,
}

impl QuestionContext {
    /// Create a context for a bare question with no session metadata.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            question: question.into(),
            domain: None,
            user_id: String::new(),
            session_id: String::new(),
            conversation_history: Vec::new(),
            additional_context: serde_json::Map::new(),
        }
    }

    /// Tag the question with an explicit domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

// ---------------------------------------------------------------------------
// AnswerResult
// ---------------------------------------------------------------------------

/// A citation pointing back at a retrieved knowledge chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCitation {
    pub source_document: String,
    pub chunk_id: String,
    pub similarity_score: f64,
}

/// A generated answer travelling through postprocessing.
///
/// Adapters may rewrite `answer` and adjust `confidence`; the caller owns the value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    /// Reliability estimate in `[0.0, 1.0]`.
    pub confidence: f64,
    #[serde(default)]
    pub sources: Vec<SourceCitation>,
    #[serde(default)]
    pub reasoning_steps: Vec<String>,
    #[serde(default = "Utc::now")]
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub model_used: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tokens_used: HashMap<String, u64>,
}

impl AnswerResult {
    /// Create a result with the given text and (clamped) confidence.
    pub fn new(answer: impl Into<String>, confidence: f64) -> Self {
        Self {
            answer: answer.into(),
            confidence: clamp_confidence(confidence),
            sources: Vec::new(),
            reasoning_steps: Vec::new(),
            generated_at: Utc::now(),
            model_used: String::new(),
            tokens_used: HashMap::new(),
        }
    }

    /// Set the confidence, clamping into `[0.0, 1.0]`.
    pub fn set_confidence(&mut self, value: f64) {
        self.confidence = clamp_confidence(value);
    }

    /// Multiply the confidence by `factor`, clamping the result.
    pub fn scale_confidence(&mut self, factor: f64) {
        self.set_confidence(self.confidence * factor);
    }
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// A retrieved knowledge snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub chunk_id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub source_document: String,
    #[serde(default)]
    pub chunk_index: usize,
}

/// One hit from the external retrieval store. Never mutated by this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: KnowledgeChunk,
    pub similarity_score: f64,
    pub rank: usize,
}

impl SearchResult {
    /// Build a citation for this hit.
    pub fn citation(&self) -> SourceCitation {
        SourceCitation {
            source_document: self.chunk.source_document.clone(),
            chunk_id: self.chunk.chunk_id.clone(),
            similarity_score: self.similarity_score,
        }
    }
}

// ---------------------------------------------------------------------------
// DomainInfo
// ---------------------------------------------------------------------------

/// Summary counts describing one adapter's knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub domain_name: String,
    pub key_concepts_count: usize,
    pub terminology_count: usize,
    pub common_questions_count: usize,
    pub expert_sources_count: usize,
}

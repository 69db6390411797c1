//! Engine-level answer checks, applied after adapter postprocessing.

use serde::{Deserialize, Serialize};

use domainqa_shared::{AnswerResult, EngineConfig};

/// A confidence penalty applied by [`apply_engine_checks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePenalty {
    ShortAnswer,
    Uncertain,
    MissingSources,
}

/// Scale `answer.confidence` by every penalty that applies and return them in
/// the order applied. Confidence stays within `[0.0, 1.0]`.
pub fn apply_engine_checks(answer: &mut AnswerResult, config: &EngineConfig) -> Vec<EnginePenalty> {
    let mut applied = Vec::new();

    if answer.answer.trim().chars().count() < config.min_answer_chars {
        answer.scale_confidence(config.short_answer_penalty);
        applied.push(EnginePenalty::ShortAnswer);
    }

    let lowered = answer.answer.to_lowercase();
    if config
        .uncertain_phrases
        .iter()
        .any(|p| !p.is_empty() && lowered.contains(&p.to_lowercase()))
    {
        answer.scale_confidence(config.uncertainty_penalty);
        applied.push(EnginePenalty::Uncertain);
    }

    if config.enable_source_citation && answer.sources.is_empty() {
        answer.scale_confidence(config.missing_source_penalty);
        applied.push(EnginePenalty::MissingSources);
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use domainqa_shared::SourceCitation;

    fn cited(text: &str, confidence: f64) -> AnswerResult {
        let mut answer = AnswerResult::new(text, confidence);
        answer.sources.push(SourceCitation {
            source_document: "guide.pdf".into(),
            chunk_id: "c1".into(),
            similarity_score: 0.9,
        });
        answer
    }

    #[test]
    fn clean_answer_is_untouched() {
        let mut answer = cited("Rest and drink plenty of fluids.", 0.8);
        assert!(apply_engine_checks(&mut answer, &EngineConfig::default()).is_empty());
        assert_eq!(answer.confidence, 0.8);
    }

    #[test]
    fn penalties_compound() {
        let mut answer = AnswerResult::new("Not sure.", 1.0);
        let applied = apply_engine_checks(&mut answer, &EngineConfig::default());
        assert_eq!(
            applied,
            vec![
                EnginePenalty::ShortAnswer,
                EnginePenalty::Uncertain,
                EnginePenalty::MissingSources
            ]
        );
        assert!((answer.confidence - 0.5 * 0.7 * 0.8).abs() < 1e-9);
    }

    #[test]
    fn uncertainty_is_case_insensitive() {
        let mut answer = cited("Sorry, the documents do not cover this case.", 0.6);
        let applied = apply_engine_checks(&mut answer, &EngineConfig::default());
        assert_eq!(applied, vec![EnginePenalty::Uncertain]);
        assert!((answer.confidence - 0.42).abs() < 1e-9);
    }

    #[test]
    fn missing_sources_ignored_when_citation_disabled() {
        let config = EngineConfig {
            enable_source_citation: false,
            ..EngineConfig::default()
        };
        let mut answer = AnswerResult::new("Rest and drink plenty of fluids.", 0.8);
        assert!(apply_engine_checks(&mut answer, &config).is_empty());
    }
}

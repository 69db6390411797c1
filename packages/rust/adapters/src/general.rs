//! General (fallback) domain adapter.
//!
//! Always matches. Uses the knowledge-grounded default prompt and the shared
//! default behavior for every other hook.

use tracing::Span;

use domainqa_shared::Result;

use crate::adapter::{AdapterCore, AdapterOptions, DomainAdapter};
use crate::knowledge::DomainKnowledge;

const DEFAULT_PROMPT: &str = "You are a professional knowledge assistant with the following abilities:

1. Prefer the provided knowledge: when relevant knowledge is supplied, base the answer on it rather than on pre-trained knowledge alone
2. Cite sources accurately: state which document or source each piece of information comes from
3. Stay consistent with the knowledge: never add information that contradicts it
4. Acknowledge limits: if the knowledge is not enough to answer fully, say so and help as far as possible
5. Give complete, accurate answers grounded in the available knowledge
6. Stay professional and objective, avoiding speculation

Reminders:
- The \"relevant knowledge\" section contains documents the user has provided; answer from it first
- Use concrete statistics, findings, or expert information from it directly
- Mark where information comes from, e.g. \"According to the provided document...\"";

const REASONING_ADDENDUM: &str = "\n\nInclude your reasoning in the answer and explain how you reached the conclusion from the provided knowledge.";

/// Adapter used when no specific domain matches.
#[derive(Debug)]
pub struct GeneralAdapter {
    core: AdapterCore,
}

impl GeneralAdapter {
    pub const DOMAIN: &'static str = "general";

    pub fn new(options: &AdapterOptions) -> Result<Self> {
        Ok(Self {
            core: AdapterCore::new(Self::init_knowledge(), options)?,
        })
    }
}

impl DomainAdapter for GeneralAdapter {
    fn init_knowledge() -> DomainKnowledge {
        DomainKnowledge {
            domain_name: Self::DOMAIN.into(),
            key_concepts: [
                "according to", "for example", "because", "research", "study", "evidence",
                "data", "source", "definition", "process",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            terminology: [
                ("gonna", "going to"),
                ("wanna", "want to"),
                ("dunno", "do not know"),
                ("thx", "thanks"),
                ("pls", "please"),
            ]
            .into_iter()
            .collect(),
            common_questions: [
                "What is the definition of this concept?",
                "What are the main causes of this problem?",
                "How does this process work?",
                "What are the advantages and disadvantages?",
                "What is the difference between these two?",
                "What are some examples of this?",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            expert_sources: [
                "Encyclopedias",
                "Peer-reviewed journals",
                "Official documentation",
                "User-provided documents",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            quality_indicators: [
                "according to the document",
                "the document mentions",
                "research shows",
                "data indicates",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    fn knowledge(&self) -> &DomainKnowledge {
        self.core.knowledge()
    }

    fn span(&self) -> &Span {
        self.core.span()
    }

    fn matches(&self, _question: &str) -> bool {
        true
    }

    fn build_system_prompt(&self, _question: &str) -> String {
        format!("{DEFAULT_PROMPT}{REASONING_ADDENDUM}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domainqa_shared::{AnswerResult, QuestionContext};

    fn adapter() -> GeneralAdapter {
        GeneralAdapter::new(&AdapterOptions {
            strict_terminology: true,
        })
        .expect("general adapter")
    }

    #[test]
    fn always_matches() {
        let adapter = adapter();
        assert!(adapter.matches(""));
        assert!(adapter.matches("How do I file my taxes?"));
    }

    #[test]
    fn prompt_is_never_empty() {
        let prompt = adapter().build_system_prompt("");
        assert!(prompt.starts_with(DEFAULT_PROMPT));
        assert!(prompt.ends_with(REASONING_ADDENDUM));
    }

    #[test]
    fn uses_default_hooks() {
        let adapter = adapter();
        assert_eq!(
            adapter.preprocess_question("I wanna know what the data says, thx"),
            "I want to know what the data says, thanks"
        );

        let mut answer = AnswerResult::new("Research shows the data is consistent.", 0.5);
        adapter.post_process_answer(&mut answer, &QuestionContext::new("Is it consistent?"), &[]);
        assert_eq!(answer.answer, "Research shows the data is consistent.");
        assert!(answer.confidence > 0.5);
        assert_eq!(adapter.suggestion_cap(), 5);
    }
}

//! Medical domain adapter.
//!
//! Adds safety rules on top of the shared defaults: emergency, medication, and
//! diagnosis classifiers that strengthen the system prompt, annotation of
//! sensitive or urgent questions, a mandatory disclaimer, a confidence penalty
//! for prescriptive answers, and an emergency banner.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{Span, debug, warn};

use domainqa_shared::{
    AnswerResult, QualityIssue, QualityReport, QuestionContext, Result, SearchResult,
};

use crate::adapter::{AdapterCore, AdapterOptions, DomainAdapter};
use crate::defaults;
use crate::knowledge::DomainKnowledge;
use crate::text::{contains_any_ci, dedup_truncate, word_matcher};

/// Confidence multiplier applied when the answer gives prescriptive advice.
pub const INAPPROPRIATE_ADVICE_PENALTY: f64 = 0.3;

/// Answers longer than this (in chars) must carry a disclaimer.
pub const DISCLAIMER_REQUIRED_ABOVE_CHARS: usize = 100;

pub const SUGGESTION_CAP: usize = 8;

pub const EMERGENCY_ADDENDUM: &str = "\n\n⚠️ Note: if this is a medical emergency, seek medical care immediately or call your local emergency number!";
pub const MEDICATION_ADDENDUM: &str = "\n\n💊 Medication reminder: any medication should only be used under a doctor's guidance. Do not self-medicate.";
pub const DIAGNOSIS_ADDENDUM: &str = "\n\n🩺 Diagnosis reminder: I cannot provide a medical diagnosis. Symptom descriptions are for reference only; please consult a doctor.";

pub const SENSITIVE_NOTE: &str =
    " [Note: I cannot provide a medical diagnosis; please consult a qualified doctor]";
pub const URGENT_NOTE: &str =
    " [Urgent: if you have emergency symptoms, seek medical care immediately!]";

pub const DISCLAIMER: &str = "\n\n⚠️ Important: the information above is for reference only and cannot replace professional medical advice. If you have a health concern, please consult a doctor or another qualified medical professional.";
pub const ADVICE_WARNING: &str = "\n\n⚠️ Warning: do not self-medicate or self-diagnose based on this information; always consult a doctor.";
pub const EMERGENCY_BANNER: &str = "🚨 Emergency: if you have these symptoms, call your local emergency number or go to the nearest emergency department immediately!";

const BASE_PROMPT: &str = "You are a professional medical and health information assistant with the following abilities:

1. Provide accurate medical information based on evidence-based medicine
2. Follow medical ethics and never give a specific diagnosis or treatment plan
3. Emphasize the importance of professional medical care
4. Share scientific, objective health knowledge
5. Recognize medical emergencies and advise seeking care promptly

Important disclaimer:
- Answers are for health education and reference only
- They cannot replace professional diagnosis and treatment
- Any health problem should be discussed with a qualified medical professional
- In an emergency, go to a hospital or call emergency services immediately

Principles:
- Rely on authoritative medical literature and clinical guidelines
- Use accurate medical terminology
- Emphasize prevention and a healthy lifestyle
- Remind the user that individual circumstances differ";

/// Phrases that count as an existing disclaimer.
const DISCLAIMER_MARKERS: &[&str] = &["for reference only", "consult a doctor"];

/// Prescriptive or diagnostic phrasing the assistant must not use.
const INAPPROPRIATE_ADVICE: &[&str] = &[
    "you should take",
    "i recommend you take",
    "this medication is right for you",
    "your diagnosis is",
    "you are diagnosed with",
];

// Keyword matchers below match whole words only (see `word_matcher`), so
// "pain" does not fire on "Spain" and "rash" does not fire on "crash".

/// Question keywords that trigger the emergency banner on the answer.
static EMERGENCY_BANNER_TRIGGERS: LazyLock<Regex> = LazyLock::new(|| {
    word_matcher(&[
        "chest pain",
        "difficulty breathing",
        "unconscious",
        "severe bleeding",
    ])
});

/// Keywords annotated as urgent during preprocessing.
static URGENT_SYMPTOMS: LazyLock<Regex> = LazyLock::new(|| {
    word_matcher(&[
        "chest pain",
        "difficulty breathing",
        "shortness of breath",
        "unconscious",
        "severe bleeding",
        "poisoning",
        "allergic reaction",
        "acute abdominal pain",
        "persistent high fever",
        "confusion",
        "seizure",
    ])
});

static EMERGENCY_INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    word_matcher(&[
        "emergenc*",
        "urgent",
        "first aid",
        "unconscious",
        "choking",
        "severe bleeding",
        "poisoning",
        "anaphylaxis",
        "cardiac arrest",
        "stroke",
        "heart attack",
        "chest pain",
    ])
});

static MEDICATION_INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    word_matcher(&[
        "medicine",
        "medication",
        "drug",
        "pill",
        "take for",
        "dose",
        "dosage",
        "side effect",
        "antibiotic",
        "painkiller",
        "prescription",
        "treatment",
    ])
});

static DIAGNOSIS_INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    word_matcher(&[
        "diagnos*",
        "what disease",
        "do i have",
        "symptom",
        "test result",
        "lab result",
        "could it be",
        "might it be",
        "is it serious",
    ])
});

/// Terms whose presence in the question calls for matching terms in the answer.
const CORE_MEDICAL_TERMS: &[&str] = &["diagnosis", "treatment", "symptom", "disease"];

/// Words that route an untagged question to this adapter.
static DETECTION_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    word_matcher(&[
        "doctor", "nurse", "clinic", "hospital", "medical", "medicine", "medication",
        "health", "pain", "painful", "fever", "sick", "illness", "disease", "symptom",
        "diagnos*", "infection", "vaccin*", "cancer", "tumor", "surgery",
    ])
});

static SENSITIVE_REQUESTS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bdo i have\b.*\b(disease|illness|condition|cancer|infection)",
        r"(?i)\bdiagnose me\b",
        r"(?i)\bwhat (disease|illness|condition) (is this|do i have)",
        r"(?i)\bwhat (medicine|medication|drug)s? (should|do|can) i (take|use)",
        r"(?i)\bwhat (should|can) i take for\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

const SPECIALTIES: &[&str] = &[
    "Internal medicine",
    "Surgery",
    "Obstetrics and gynecology",
    "Pediatrics",
    "Ophthalmology",
    "Otolaryngology",
    "Dermatology",
    "Neurology",
    "Psychiatry",
    "Orthopedics",
    "Urology",
    "Oncology",
    "Cardiology",
    "Pulmonology",
    "Gastroenterology",
    "Endocrinology",
    "Nephrology",
    "Hematology",
    "Rheumatology and immunology",
    "Infectious diseases",
    "Emergency medicine",
    "Rehabilitation medicine",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Topic classification
// ---------------------------------------------------------------------------

/// Body-system topic of a medical question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MedicalTopic {
    Neurological,
    Cardiovascular,
    Respiratory,
    Digestive,
    Dermatological,
    Musculoskeletal,
    MentalHealth,
    GeneralMedicine,
}

impl MedicalTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neurological => "neurological",
            Self::Cardiovascular => "cardiovascular",
            Self::Respiratory => "respiratory",
            Self::Digestive => "digestive",
            Self::Dermatological => "dermatological",
            Self::Musculoskeletal => "musculoskeletal",
            Self::MentalHealth => "mental_health",
            Self::GeneralMedicine => "general_medicine",
        }
    }
}

impl std::fmt::Display for MedicalTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked top to bottom; the first topic with a matching keyword wins.
static TOPIC_KEYWORDS: LazyLock<Vec<(MedicalTopic, Regex)>> = LazyLock::new(|| {
    let table: [(MedicalTopic, &[&str]); 7] = [
        (
            MedicalTopic::Neurological,
            &["headache", "dizz*", "memory loss", "migraine", "numbness"],
        ),
        (
            MedicalTopic::Cardiovascular,
            &[
                "chest pain",
                "palpitation",
                "blood pressure",
                "heart rate",
                "heartbeat",
                "heart disease",
            ],
        ),
        (
            MedicalTopic::Respiratory,
            &["cough*", "breath", "breathe", "breathing", "lung", "asthma", "wheez*"],
        ),
        (
            MedicalTopic::Digestive,
            &["stomach", "abdominal", "digestion", "digestive", "indigestion", "nausea"],
        ),
        (
            MedicalTopic::Dermatological,
            &["skin", "rash", "eczema", "allerg*", "acne", "itchy"],
        ),
        (
            MedicalTopic::Musculoskeletal,
            &["joint pain", "bone", "muscle", "sprain*", "back pain", "arthritis"],
        ),
        (
            MedicalTopic::MentalHealth,
            &["depress*", "anxiety", "anxious", "mood swing", "stress*", "panic attack"],
        ),
    ];
    table
        .into_iter()
        .map(|(topic, keywords)| (topic, word_matcher(keywords)))
        .collect()
});

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Adapter for medical and health questions.
#[derive(Debug)]
pub struct MedicalAdapter {
    core: AdapterCore,
    /// Lay terminology keys, matched as whole phrases during detection.
    lay_terms: Regex,
}

impl MedicalAdapter {
    pub const DOMAIN: &'static str = "medical";

    pub fn new(options: &AdapterOptions) -> Result<Self> {
        let core = AdapterCore::new(Self::init_knowledge(), options)?;
        let keys: Vec<&str> = core.knowledge().terminology.iter().map(|(k, _)| k).collect();
        let lay_terms = word_matcher(&keys);
        Ok(Self { core, lay_terms })
    }

    pub fn is_emergency_question(&self, question: &str) -> bool {
        EMERGENCY_INDICATORS.is_match(question)
    }

    pub fn is_medication_question(&self, question: &str) -> bool {
        MEDICATION_INDICATORS.is_match(question)
    }

    pub fn is_diagnosis_question(&self, question: &str) -> bool {
        DIAGNOSIS_INDICATORS.is_match(question)
    }

    /// Map a question to its body-system topic.
    pub fn classify_question(&self, question: &str) -> MedicalTopic {
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.is_match(question))
            .map(|(topic, _)| *topic)
            .unwrap_or(MedicalTopic::GeneralMedicine)
    }

    /// Medical specialties, for display.
    pub fn specialties(&self) -> &'static [&'static str] {
        SPECIALTIES
    }

    fn has_disclaimer(text: &str) -> bool {
        contains_any_ci(text, DISCLAIMER_MARKERS)
    }
}

impl DomainAdapter for MedicalAdapter {
    fn init_knowledge() -> DomainKnowledge {
        DomainKnowledge {
            domain_name: Self::DOMAIN.into(),
            key_concepts: owned(&[
                "diagnosis", "treatment", "symptom", "prevention", "medication", "disease",
                "clinical", "pathology", "physiology", "anatomy", "immune", "infection",
                "inflammation", "tumor", "cancer", "cardiovascular", "respiratory", "digestive",
                "nervous system", "endocrine", "orthopedic", "dermatology", "gynecology",
                "pediatric", "psychiatric", "surgery", "examination", "laboratory test",
                "imaging", "CT scan", "MRI", "X-ray", "blood", "urine", "genetic", "hereditary",
                "nutrition", "exercise", "rehabilitation",
            ]),
            terminology: [
                ("heart attack", "myocardial infarction"),
                ("high blood pressure", "hypertension"),
                ("low blood pressure", "hypotension"),
                ("common cold", "upper respiratory infection"),
                ("the flu", "influenza"),
                ("heartburn", "gastroesophageal reflux"),
                ("stomach ache", "gastric pain"),
                ("tummy ache", "abdominal pain"),
                ("sugar diabetes", "diabetes mellitus"),
                ("broken bone", "fracture"),
                ("pink eye", "conjunctivitis"),
                ("trouble sleeping", "sleep disorder"),
                ("runny nose", "rhinorrhea"),
            ]
            .into_iter()
            .collect(),
            common_questions: owned(&[
                "What disease could this symptom indicate?",
                "How can this disease be prevented?",
                "What are the side effects of this medication?",
                "What should I pay attention to after surgery?",
                "How should rehabilitation training be done?",
                "Is this examination necessary?",
                "What should I pay attention to in my diet?",
                "Does exercise help with this disease?",
                "How can the early symptoms of a disease be recognized?",
                "When should I seek immediate medical attention?",
            ]),
            expert_sources: owned(&[
                "Medical textbooks",
                "Clinical guidelines",
                "Medical journals",
                "Hospital publications",
                "WHO reports",
                "National health authority publications",
                "Expert monographs",
            ]),
            quality_indicators: owned(&[
                "clinical evidence",
                "evidence-based",
                "guidelines recommend",
                "expert consensus",
                "randomized controlled trial",
                "meta-analysis",
                "case report",
                "epidemiological data",
            ]),
        }
    }

    fn knowledge(&self) -> &DomainKnowledge {
        self.core.knowledge()
    }

    fn span(&self) -> &Span {
        self.core.span()
    }

    fn matches(&self, question: &str) -> bool {
        DETECTION_TERMS.is_match(question)
            || self.lay_terms.is_match(question)
            || self.is_emergency_question(question)
            || self.classify_question(question) != MedicalTopic::GeneralMedicine
    }

    fn build_system_prompt(&self, question: &str) -> String {
        let mut prompt = BASE_PROMPT.to_string();

        if self.is_emergency_question(question) {
            prompt.push_str(EMERGENCY_ADDENDUM);
        }
        if self.is_medication_question(question) {
            prompt.push_str(MEDICATION_ADDENDUM);
        }
        if self.is_diagnosis_question(question) {
            prompt.push_str(DIAGNOSIS_ADDENDUM);
        }

        prompt
    }

    fn preprocess_question(&self, question: &str) -> String {
        let _guard = self.span().enter();
        let mut processed = defaults::preprocess_question(self.knowledge(), question);

        if SENSITIVE_REQUESTS.iter().any(|re| re.is_match(&processed)) {
            debug!("sensitive request detected");
            processed.push_str(SENSITIVE_NOTE);
        }

        if URGENT_SYMPTOMS.is_match(&processed) {
            debug!("urgent symptom detected");
            processed.push_str(URGENT_NOTE);
        }

        processed
    }

    fn post_process_answer(
        &self,
        answer: &mut AnswerResult,
        context: &QuestionContext,
        _knowledge: &[SearchResult],
    ) {
        defaults::post_process_answer(self, answer);
        let _guard = self.span().enter();

        if !Self::has_disclaimer(&answer.answer) {
            answer.answer.push_str(DISCLAIMER);
        }

        if contains_any_ci(&answer.answer, INAPPROPRIATE_ADVICE) {
            warn!(
                confidence = answer.confidence,
                "answer contains prescriptive advice, applying penalty"
            );
            answer.scale_confidence(INAPPROPRIATE_ADVICE_PENALTY);
            answer.answer.push_str(ADVICE_WARNING);
        }

        if EMERGENCY_BANNER_TRIGGERS.is_match(&context.question) {
            answer.answer = format!("{EMERGENCY_BANNER}\n\n{}", answer.answer);
        }
    }

    fn validate_answer_quality(&self, answer: &str, question: &str) -> QualityReport {
        let base = defaults::validate_answer_quality(self, answer, question);
        let mut issues = Vec::new();

        if contains_any_ci(answer, INAPPROPRIATE_ADVICE) {
            issues.push(QualityIssue::InappropriateAdvice);
        }

        if answer.chars().count() > DISCLAIMER_REQUIRED_ABOVE_CHARS
            && !Self::has_disclaimer(answer)
        {
            issues.push(QualityIssue::MissingDisclaimer);
        }

        if contains_any_ci(question, CORE_MEDICAL_TERMS)
            && !contains_any_ci(answer, CORE_MEDICAL_TERMS)
        {
            issues.push(QualityIssue::InsufficientTerminology);
        }

        let report = base.merge(QualityReport::from_issues(issues));
        if !report.passed {
            debug!(parent: self.span(), issues = ?report.issues, "answer failed validation");
        }
        report
    }

    fn classify(&self, question: &str) -> Map<String, Value> {
        let mut labels = Map::new();
        labels.insert("topic".into(), self.classify_question(question).as_str().into());
        labels.insert("emergency".into(), self.is_emergency_question(question).into());
        labels.insert("medication".into(), self.is_medication_question(question).into());
        labels.insert("diagnosis".into(), self.is_diagnosis_question(question).into());
        labels
    }

    fn suggestion_cap(&self) -> usize {
        SUGGESTION_CAP
    }

    fn suggest_related_questions(&self, question: &str) -> Vec<String> {
        let mut related = defaults::suggest_related_questions(self.knowledge(), question);
        let lowered = question.to_lowercase();

        if lowered.contains("symptom") {
            related.extend(owned(&[
                "What are the common causes of this symptom?",
                "What should I watch for when this symptom appears?",
                "When should I seek immediate medical attention?",
            ]));
        }
        if lowered.contains("prevent") {
            related.extend(owned(&[
                "How can this be prevented in daily life?",
                "Are there dietary precautions?",
                "Does exercise help with prevention?",
            ]));
        }
        if lowered.contains("medic") || lowered.contains("drug") || lowered.contains("pill") {
            related.extend(owned(&[
                "What are the side effects of this medication?",
                "What should I watch for while taking this medication?",
                "Are there alternative treatments?",
            ]));
        }

        dedup_truncate(related, self.suggestion_cap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> MedicalAdapter {
        MedicalAdapter::new(&AdapterOptions::default()).expect("medical adapter")
    }

    #[test]
    fn terminology_passes_strict_mode() {
        let strict = AdapterOptions {
            strict_terminology: true,
        };
        assert!(MedicalAdapter::new(&strict).is_ok());
    }

    #[test]
    fn medication_question_gets_caution_addendum() {
        let adapter = adapter();
        let question = "What medicine should I take for chest pain?";
        assert!(adapter.is_medication_question(question));
        assert!(adapter.is_emergency_question(question));

        let prompt = adapter.build_system_prompt(question);
        assert!(prompt.contains(MEDICATION_ADDENDUM));
        assert!(prompt.contains(EMERGENCY_ADDENDUM));
        assert!(prompt.starts_with(BASE_PROMPT));
    }

    #[test]
    fn neutral_question_gets_base_prompt_only() {
        let adapter = adapter();
        assert_eq!(adapter.build_system_prompt("How does the immune system work?"), BASE_PROMPT);
        assert!(!adapter.build_system_prompt("").is_empty());
    }

    #[test]
    fn diagnosis_question_gets_diagnosis_addendum() {
        let prompt = adapter().build_system_prompt("Could it be a serious symptom?");
        assert!(prompt.contains(DIAGNOSIS_ADDENDUM));
    }

    #[test]
    fn preprocess_flags_sensitive_requests() {
        let processed = adapter().preprocess_question("Do I have heart disease?");
        assert_eq!(processed, format!("Do I have heart disease?{SENSITIVE_NOTE}"));
    }

    #[test]
    fn preprocess_normalizes_then_appends_urgent_note() {
        let adapter = adapter();
        let question = "I have chest pain after a heart attack";
        let base = defaults::preprocess_question(adapter.knowledge(), question);
        let processed = adapter.preprocess_question(question);

        assert_eq!(base, "I have chest pain after a myocardial infarction");
        assert!(processed.starts_with(&base));
        assert!(processed.ends_with(URGENT_NOTE));
    }

    #[test]
    fn preprocess_plain_question_is_unchanged() {
        assert_eq!(
            adapter().preprocess_question("How much water should adults drink?"),
            "How much water should adults drink?"
        );
        assert_eq!(adapter().preprocess_question(""), "");
    }

    #[test]
    fn post_process_appends_disclaimer_once() {
        let adapter = adapter();
        let ctx = QuestionContext::new("How is influenza spread?");

        let mut answer = AnswerResult::new("Influenza spreads through respiratory droplets.", 0.5);
        adapter.post_process_answer(&mut answer, &ctx, &[]);
        assert!(answer.answer.ends_with(DISCLAIMER));

        let mut answer = AnswerResult::new(
            "Influenza spreads through droplets; consult a doctor if unwell.",
            0.5,
        );
        adapter.post_process_answer(&mut answer, &ctx, &[]);
        assert!(!answer.answer.contains(DISCLAIMER));
    }

    #[test]
    fn post_process_penalizes_prescriptive_advice() {
        let adapter = adapter();
        let ctx = QuestionContext::new("My back hurts");
        let mut answer = AnswerResult::new("You should take ibuprofen twice a day.", 0.8);
        adapter.post_process_answer(&mut answer, &ctx, &[]);

        assert!(answer.confidence <= 0.8 * INAPPROPRIATE_ADVICE_PENALTY + 1e-9);
        assert!(answer.answer.ends_with(ADVICE_WARNING));
        assert!((0.0..=1.0).contains(&answer.confidence));
    }

    #[test]
    fn post_process_prepends_emergency_banner() {
        let adapter = adapter();
        let ctx = QuestionContext::new("I have sudden chest pain, what now?");
        let mut answer = AnswerResult::new("Chest pain can have many causes.", 0.6);
        adapter.post_process_answer(&mut answer, &ctx, &[]);

        assert!(answer.answer.starts_with(EMERGENCY_BANNER));
        assert!(answer.answer.contains("\n\nChest pain can have many causes."));
    }

    #[test]
    fn banner_follows_question_not_answer() {
        let adapter = adapter();

        let ctx = QuestionContext::new("Why do I feel tired after lunch?");
        let mut answer = AnswerResult::new(
            "Tiredness after meals is common; chest pain would be a different matter.",
            0.6,
        );
        adapter.post_process_answer(&mut answer, &ctx, &[]);
        assert!(!answer.answer.contains(EMERGENCY_BANNER));

        let ctx = QuestionContext::new("My father has chest pain and is sweating");
        let mut answer = AnswerResult::new("Call for help and keep him seated.", 0.6);
        adapter.post_process_answer(&mut answer, &ctx, &[]);
        assert!(answer.answer.starts_with(EMERGENCY_BANNER));
    }

    #[test]
    fn validation_flags_medical_issues() {
        let adapter = adapter();
        let long_answer = "You should take an inhaler every morning and avoid cold air, smoke, \
                           dust, pollen, and strenuous exercise during the long winter months.";
        let report =
            adapter.validate_answer_quality(long_answer, "What is the treatment for asthma?");

        assert!(!report.passed);
        assert!(report.has(QualityIssue::InappropriateAdvice));
        assert!(report.has(QualityIssue::MissingDisclaimer));
        assert!(report.has(QualityIssue::InsufficientTerminology));
    }

    #[test]
    fn validation_passes_careful_answer() {
        let adapter = adapter();
        let answer = "Asthma treatment usually combines controller and reliever inhalers \
                      chosen by a clinician; this is for reference only, so consult a doctor.";
        let report = adapter.validate_answer_quality(answer, "What is the treatment for asthma?");
        assert!(report.passed, "{:?}", report.issues);
    }

    #[test]
    fn short_answer_is_too_short() {
        let report = adapter().validate_answer_quality("Rest.", "What is the treatment?");
        assert!(report.has(QualityIssue::TooShort));
        assert!(!report.passed);
    }

    #[test]
    fn suggestions_are_capped_and_unique() {
        let adapter = adapter();
        let related = adapter.suggest_related_questions(
            "What symptom means I should prevent this and which medication helps?",
        );
        assert!(related.len() <= SUGGESTION_CAP);
        let mut sorted = related.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), related.len());
        assert!(related.contains(&"What are the common causes of this symptom?".to_string()));
    }

    #[test]
    fn symptom_suggestions_follow_common_questions() {
        let related = adapter().suggest_related_questions("early symptoms of a disease");
        assert_eq!(related[0], "How can the early symptoms of a disease be recognized?");
        let watch_for = "What should I watch for when this symptom appears?".to_string();
        assert!(related.contains(&watch_for));
    }

    #[test]
    fn topic_classification_uses_priority_order() {
        let topic = |q: &str| adapter().classify_question(q);
        assert_eq!(topic("headache and chest pain"), MedicalTopic::Neurological);
        assert_eq!(topic("Sudden CHEST PAIN"), MedicalTopic::Cardiovascular);
        assert_eq!(topic("persistent cough"), MedicalTopic::Respiratory);
        assert_eq!(topic("I feel anxiety at night"), MedicalTopic::MentalHealth);
        assert_eq!(topic("something odd"), MedicalTopic::GeneralMedicine);
        assert_eq!(topic(""), MedicalTopic::GeneralMedicine);
    }

    #[test]
    fn topic_keywords_match_whole_words() {
        let adapter = adapter();
        let general = [
            "Why does my program crash?",
            "How do I join a trombone band?",
            "How much memory does a laptop need?",
        ];
        for question in general {
            assert_eq!(adapter.classify_question(question), MedicalTopic::GeneralMedicine);
        }

        let derm = MedicalTopic::Dermatological;
        assert_eq!(adapter.classify_question("My skin feels itchy"), derm);
        assert_eq!(adapter.classify_question("Is this an allergic rash?"), derm);
        assert_eq!(adapter.classify_question("I keep feeling dizzy"), MedicalTopic::Neurological);
    }

    #[test]
    fn classifiers_ignore_everyday_words() {
        let adapter = adapter();
        assert!(!adapter.is_medication_question("How long does it take to learn Rust?"));
        assert!(adapter.is_medication_question("What can I take for a sore throat?"));
        assert!(!adapter.is_emergency_question("Is there an urgently needed fix?"));
        assert!(adapter.is_emergency_question("Is this an emergency?"));
        assert!(adapter.is_diagnosis_question("How is asthma diagnosed?"));
    }

    #[test]
    fn classify_reports_topic_and_flags() {
        let adapter: &dyn DomainAdapter = &adapter();
        let labels = adapter.classify("What medicine should I take for chest pain?");
        assert_eq!(labels["topic"], "cardiovascular");
        assert_eq!(labels["emergency"], true);
        assert_eq!(labels["medication"], true);
        assert_eq!(labels["diagnosis"], false);
    }

    #[test]
    fn detection_and_info() {
        let adapter = adapter();
        assert!(adapter.matches("Is a fever dangerous for children?"));
        assert!(adapter.matches("what helps with heartburn"));
        assert!(adapter.matches("Is the flu contagious?"));
        assert!(!adapter.matches("How do I file my taxes?"));
        assert!(!adapter.matches("Is the fluid in this pump safe to drink?"));
        assert!(!adapter.matches("What is the capital of Spain?"));
        assert_eq!(adapter.name(), "medical");
        assert_eq!(adapter.domain_info().terminology_count, 13);
        assert!(adapter.specialties().contains(&"Cardiology"));
    }

    #[test]
    fn topic_serializes_as_code() {
        let json = serde_json::to_string(&MedicalTopic::MentalHealth).unwrap();
        assert_eq!(json, "\"mental_health\"");
        assert_eq!(MedicalTopic::MentalHealth.to_string(), "mental_health");
    }
}

//! Static domain knowledge owned by each adapter.

use serde::Serialize;

use domainqa_shared::{DomainInfo, DomainQaError, Result};

// ---------------------------------------------------------------------------
// Terminology
// ---------------------------------------------------------------------------

/// Ordered informal → canonical term substitutions.
///
/// Substitutions are applied in insertion order and are not commutative: when
/// one key is a substring of another, or a canonical term contains a key, an
/// earlier replacement can change what a later one matches. Use
/// [`Terminology::find_overlaps`] (or strict mode at adapter construction) to
/// detect such maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Terminology {
    entries: Vec<(String, String)>,
}

/// A pair of terminology entries whose substitutions interact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOverlap {
    /// `outer` contains `inner` as a substring.
    KeyContainsKey { outer: String, inner: String },
    /// The canonical term for `entry` contains the key `key`.
    CanonicalContainsKey {
        entry: String,
        canonical: String,
        key: String,
    },
}

impl std::fmt::Display for TermOverlap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyContainsKey { outer, inner } => {
                write!(f, "key '{outer}' contains key '{inner}'")
            }
            Self::CanonicalContainsKey {
                entry,
                canonical,
                key,
            } => write!(f, "'{entry}' maps to '{canonical}', which contains key '{key}'"),
        }
    }
}

impl Terminology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a substitution. Re-inserting an existing key replaces its canonical
    /// term but keeps its original position.
    pub fn insert(&mut self, informal: impl Into<String>, canonical: impl Into<String>) {
        let informal = informal.into();
        let canonical = canonical.into();
        match self.entries.iter_mut().find(|(k, _)| *k == informal) {
            Some(entry) => entry.1 = canonical,
            None => self.entries.push((informal, canonical)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every occurrence of each informal term, in insertion order.
    /// Matching is literal and case-sensitive.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (informal, canonical) in &self.entries {
            if informal != canonical && out.contains(informal.as_str()) {
                out = out.replace(informal.as_str(), canonical);
            }
        }
        out
    }

    /// Report every pair of entries whose substitutions interact.
    /// Identity mappings (`canonical == informal`) never count.
    pub fn find_overlaps(&self) -> Vec<TermOverlap> {
        let mut overlaps = Vec::new();

        for (i, (outer, _)) in self.entries.iter().enumerate() {
            for (j, (inner, _)) in self.entries.iter().enumerate() {
                if i != j && outer.contains(inner.as_str()) {
                    overlaps.push(TermOverlap::KeyContainsKey {
                        outer: outer.clone(),
                        inner: inner.clone(),
                    });
                }
            }
        }

        for (entry, canonical) in &self.entries {
            if entry == canonical {
                continue;
            }
            for (key, _) in &self.entries {
                if canonical.contains(key.as_str()) {
                    overlaps.push(TermOverlap::CanonicalContainsKey {
                        entry: entry.clone(),
                        canonical: canonical.clone(),
                        key: key.clone(),
                    });
                }
            }
        }

        overlaps
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Terminology {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut terms = Terminology::new();
        for (k, v) in iter {
            terms.insert(k, v);
        }
        terms
    }
}

// ---------------------------------------------------------------------------
// DomainKnowledge
// ---------------------------------------------------------------------------

/// Vocabulary and reference material for one domain.
///
/// Built once when the adapter is constructed and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DomainKnowledge {
    /// Unique domain identifier (also the registry key).
    pub domain_name: String,
    /// Vocabulary used for confidence and vocabulary checks.
    pub key_concepts: Vec<String>,
    /// Informal → canonical substitutions applied to questions.
    pub terminology: Terminology,
    /// Canonical questions that seed related-question suggestions.
    pub common_questions: Vec<String>,
    /// Authoritative sources (informational only).
    pub expert_sources: Vec<String>,
    /// Phrases whose presence signals a rigorous answer.
    pub quality_indicators: Vec<String>,
}

impl DomainKnowledge {
    /// Reject records that would make the adapter misbehave.
    ///
    /// With `strict_terminology`, overlapping terminology keys are rejected too.
    pub fn validate(&self, strict_terminology: bool) -> Result<()> {
        if self.domain_name.trim().is_empty() {
            return Err(DomainQaError::config("domain_name must not be empty"));
        }
        if self.key_concepts.iter().all(|c| c.trim().is_empty()) {
            return Err(DomainQaError::config(format!(
                "domain '{}' has no key_concepts",
                self.domain_name
            )));
        }
        if self.terminology.iter().any(|(k, _)| k.is_empty()) {
            return Err(DomainQaError::config(format!(
                "domain '{}' has an empty terminology key",
                self.domain_name
            )));
        }

        if strict_terminology {
            let overlaps = self.terminology.find_overlaps();
            if !overlaps.is_empty() {
                let detail = overlaps
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(DomainQaError::config(format!(
                    "domain '{}' has overlapping terminology: {detail}",
                    self.domain_name
                )));
            }
        }

        Ok(())
    }

    /// Summary counts for display.
    pub fn info(&self) -> DomainInfo {
        DomainInfo {
            domain_name: self.domain_name.clone(),
            key_concepts_count: self.key_concepts.len(),
            terminology_count: self.terminology.len(),
            common_questions_count: self.common_questions.len(),
            expert_sources_count: self.expert_sources.len(),
        }
    }
}

//! Adapter registry: ordered lookup and selection of domain adapters.

use tracing::{debug, warn};

use domainqa_shared::{AdaptersConfig, DomainInfo, DomainQaError, QuestionContext, Result};

use crate::adapter::{AdapterOptions, DomainAdapter};
use crate::general::GeneralAdapter;
use crate::medical::MedicalAdapter;

/// Holds registered adapters in priority order.
///
/// Domain-specific adapters come first; `GeneralAdapter` matches every question
/// and so belongs last.
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn DomainAdapter>>,
    default_domain: String,
}

impl AdapterRegistry {
    /// Create a registry with all built-in adapters (medical first, general last).
    pub fn new() -> Result<Self> {
        let options = AdapterOptions::default();
        Ok(Self {
            adapters: vec![
                Box::new(MedicalAdapter::new(&options)?),
                Box::new(GeneralAdapter::new(&options)?),
            ],
            default_domain: GeneralAdapter::DOMAIN.into(),
        })
    }

    /// An empty registry. Adapters are added with [`AdapterRegistry::register`].
    pub fn empty(default_domain: impl Into<String>) -> Self {
        Self {
            adapters: Vec::new(),
            default_domain: default_domain.into(),
        }
    }

    /// Build only the adapters named in `config.enabled`, in that order.
    pub fn from_config(config: &AdaptersConfig) -> Result<Self> {
        let options = AdapterOptions {
            strict_terminology: config.strict_terminology,
        };

        let mut registry = Self::empty(GeneralAdapter::DOMAIN);
        for name in &config.enabled {
            let adapter: Box<dyn DomainAdapter> = match name.as_str() {
                MedicalAdapter::DOMAIN => Box::new(MedicalAdapter::new(&options)?),
                GeneralAdapter::DOMAIN => Box::new(GeneralAdapter::new(&options)?),
                other => {
                    return Err(DomainQaError::config(format!("unknown adapter: {other}")));
                }
            };
            registry.register(adapter)?;
        }
        Ok(registry)
    }

    /// Domain used when neither a tag nor detection picks an adapter.
    pub fn with_default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = domain.into();
        self
    }

    /// Append an adapter at the lowest priority. Names must be unique.
    pub fn register(&mut self, adapter: Box<dyn DomainAdapter>) -> Result<()> {
        if self.get(adapter.name()).is_some() {
            return Err(DomainQaError::config(format!(
                "adapter registered twice: {}",
                adapter.name()
            )));
        }
        self.adapters.push(adapter);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn DomainAdapter> {
        self.adapters
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
    }

    /// Pick the adapter for `context`.
    ///
    /// An explicit domain tag naming a registered adapter wins. Otherwise the
    /// first adapter whose `matches` accepts the question, then the default domain.
    pub fn select(&self, context: &QuestionContext) -> Result<&dyn DomainAdapter> {
        if let Some(tag) = context.domain.as_deref() {
            match self.get(tag) {
                Some(adapter) => {
                    debug!(domain = tag, "adapter selected by tag");
                    return Ok(adapter);
                }
                None => warn!(domain = tag, "unknown domain tag, falling back to detection"),
            }
        }

        if let Some(adapter) = self.adapters.iter().find(|a| a.matches(&context.question)) {
            debug!(domain = adapter.name(), "adapter selected by detection");
            return Ok(adapter.as_ref());
        }

        self.get(&self.default_domain).ok_or_else(|| {
            DomainQaError::config(format!(
                "no adapter matched and default domain '{}' is not registered",
                self.default_domain
            ))
        })
    }

    /// Registered adapter names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn domains(&self) -> Vec<DomainInfo> {
        self.adapters.iter().map(|a| a.domain_info()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.names())
            .field("default_domain", &self.default_domain)
            .finish()
    }
}

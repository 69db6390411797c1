//! Domain adapters for the question-answering pipeline.
//!
//! This crate provides:
//! - [`DomainAdapter`]: the per-domain hook contract, with shared defaults in [`defaults`]
//! - [`DomainKnowledge`] and [`Terminology`]: the static knowledge each adapter owns
//! - [`MedicalAdapter`] and [`GeneralAdapter`]: the built-in adapters
//! - [`AdapterRegistry`]: selects the adapter for a question

pub mod adapter;
pub mod defaults;
pub mod general;
pub mod knowledge;
pub mod medical;
pub mod registry;
mod text;

pub use adapter::{AdapterCore, AdapterOptions, DomainAdapter};
pub use general::GeneralAdapter;
pub use knowledge::{DomainKnowledge, TermOverlap, Terminology};
pub use medical::{MedicalAdapter, MedicalTopic};
pub use registry::AdapterRegistry;

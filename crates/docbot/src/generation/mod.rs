//! Context composition and prompt rendering for answer generation

pub mod prompt;

pub use prompt::{ContextDescriptor, PromptBuilder, RequestKind};

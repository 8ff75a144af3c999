//! Storage module
//!
//! Documents are kept in memory only; nothing survives a restart.

mod registry;

pub use registry::DocumentRegistry;

//! Document ingestion: validated admission of uploads

mod service;

pub use service::{IngestReceipt, IngestionService};

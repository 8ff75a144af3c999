//! Application state for the DocBot server

use std::sync::Arc;

use crate::chat::{ConversationService, QueryService};
use crate::config::DocbotConfig;
use crate::error::Result;
use crate::ingestion::IngestionService;
use crate::providers::{build_provider, LlmProvider};
use crate::storage::DocumentRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: DocbotConfig,
    /// Document registry, shared with the services below
    registry: Arc<DocumentRegistry>,
    /// Answer generation provider
    llm_provider: Arc<dyn LlmProvider>,
    ingestion: IngestionService,
    conversation: ConversationService,
    query: QueryService,
}

impl AppState {
    /// Create application state with the provider named in `config`
    pub fn new(config: DocbotConfig) -> Result<Self> {
        config.validate()?;
        let provider = build_provider(&config.llm)?;
        Ok(Self::with_provider(config, provider))
    }

    /// Create application state around an existing provider
    pub fn with_provider(config: DocbotConfig, llm_provider: Arc<dyn LlmProvider>) -> Self {
        let registry = Arc::new(DocumentRegistry::new(config.limits.max_documents));
        let timeout = config.llm.timeout();

        let ingestion = IngestionService::from_limits(Arc::clone(&registry), &config.limits);
        let conversation = ConversationService::new(
            Arc::clone(&registry),
            Arc::clone(&llm_provider),
            config.limits.reference_policy,
            timeout,
        );
        let query = QueryService::new(Arc::clone(&llm_provider), timeout);

        tracing::info!(
            "Initialized state (provider: {}, model: {}, max documents: {}, max upload: {} MB)",
            llm_provider.name(),
            llm_provider.model(),
            config.limits.max_documents,
            config.limits.max_upload_size_mb
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                llm_provider,
                ingestion,
                conversation,
                query,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &DocbotConfig {
        &self.inner.config
    }

    /// Get the document registry
    pub fn registry(&self) -> &Arc<DocumentRegistry> {
        &self.inner.registry
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    pub fn ingestion(&self) -> &IngestionService {
        &self.inner.ingestion
    }

    pub fn conversation(&self) -> &ConversationService {
        &self.inner.conversation
    }

    pub fn query(&self) -> &QueryService {
        &self.inner.query
    }
}

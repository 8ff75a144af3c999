use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::generation::ContextDescriptor;
use crate::providers::LlmProvider;
use crate::types::{QueryRequest, QueryResponse};

/// Answers a bare query; never looks at the registry
#[derive(Clone)]
pub struct QueryService {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl QueryService {
    pub fn new(provider: Arc<dyn LlmProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResponse> {
        if request.query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }

        tracing::info!("Query: \"{}\"", request.query);

        let context = ContextDescriptor::query(request.query.clone());
        let response =
            super::generate_with_timeout(self.provider.as_ref(), &context, self.timeout).await?;

        Ok(QueryResponse { response })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::test_support::{Behavior, ScriptedLlm};
    use crate::generation::RequestKind;
    use crate::providers::PlaceholderLlm;

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let llm = Arc::new(ScriptedLlm::new(Behavior::Reply("unused".into())));
        let svc = QueryService::new(llm.clone(), Duration::from_secs(5));

        let err = svc.query(&QueryRequest::new("   ")).await.unwrap_err();
        assert!(matches!(err, Error::EmptyQuery));
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_query_forwards_text_only() {
        let llm = Arc::new(ScriptedLlm::new(Behavior::Reply("answer".into())));
        let svc = QueryService::new(llm.clone(), Duration::from_secs(5));

        let reply = svc.query(&QueryRequest::new("What is X?")).await.unwrap();
        assert_eq!(reply.response, "answer");

        let seen = llm.seen.lock();
        assert_eq!(seen[0].kind(), RequestKind::Query);
        assert_eq!(seen[0].message(), "What is X?");
        assert_eq!(seen[0].document_count(), 0);
    }

    #[tokio::test]
    async fn test_placeholder_reply_references_query() {
        let svc = QueryService::new(Arc::new(PlaceholderLlm::new()), Duration::from_secs(5));
        let reply = svc.query(&QueryRequest::new("What is X?")).await.unwrap();
        assert!(!reply.response.is_empty());
        assert!(reply.response.contains("What is X?"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_cancelled() {
        let llm = Arc::new(ScriptedLlm::new(Behavior::Hang(Duration::from_secs(60))));
        let svc = QueryService::new(llm, Duration::from_secs(1));

        let err = svc.query(&QueryRequest::new("slow?")).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled(1)));
    }
}

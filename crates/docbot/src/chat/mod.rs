//! Chat and query services
//!
//! Both are single-shot: nothing is remembered between calls.

mod conversation;
mod query;

pub use conversation::ConversationService;
pub use query::QueryService;

use std::time::Duration;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::generation::ContextDescriptor;
use crate::providers::LlmProvider;

/// Run one generation call bounded by `limit`.
///
/// Expiry drops the in-flight call and yields `Cancelled`. Failures are
/// returned as they are; there is no retry.
pub(crate) async fn generate_with_timeout(
    provider: &dyn LlmProvider,
    context: &ContextDescriptor,
    limit: Duration,
) -> Result<String> {
    match timeout(limit, provider.generate(context)).await {
        Ok(Ok(answer)) => Ok(answer),
        Ok(Err(e)) => {
            tracing::warn!("Provider '{}' failed: {}", provider.name(), e);
            Err(match e {
                Error::GenerationFailed(_) => e,
                other => Error::generation(other.to_string()),
            })
        }
        Err(_) => {
            tracing::warn!(
                "Provider '{}' did not answer within {}s",
                provider.name(),
                limit.as_secs()
            );
            Err(Error::Cancelled(limit.as_secs()))
        }
    }
}

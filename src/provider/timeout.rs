//! Deadline enforcement for search providers.
//!
//! The list controller has no timeout policy of its own; a provider that
//! never settles would leave the loading indicator up forever. Wrapping the
//! provider in [`WithTimeout`] turns a stalled call into
//! [`ProviderError::Timeout`], which the controller recovers from like any
//! other failure.

use super::{SearchProvider, SearchResult};
use crate::domain::{ProviderError, Query};
use futures_util::future::BoxFuture;
use std::time::Duration;

/// Provider wrapper that fails searches exceeding a deadline.
///
/// Must be polled inside a Tokio runtime with the time driver enabled.
#[derive(Debug, Clone)]
pub struct WithTimeout<P> {
    inner: P,
    deadline: Duration,
}

impl<P: SearchProvider> WithTimeout<P> {
    pub const fn new(inner: P, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

impl<P: SearchProvider> SearchProvider for WithTimeout<P> {
    fn search(&self, query: &Query, page: u32) -> BoxFuture<'static, SearchResult> {
        let fut = self.inner.search(query, page);
        let deadline = self.deadline;

        Box::pin(async move {
            match tokio::time::timeout(deadline, fut).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    let after_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
                    tracing::warn!(page, after_ms, "search timed out");
                    Err(ProviderError::Timeout { after_ms })
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dish;
    use crate::provider::StubProvider;

    struct NeverProvider;

    impl SearchProvider for NeverProvider {
        fn search(&self, _query: &Query, _page: u32) -> BoxFuture<'static, SearchResult> {
            Box::pin(std::future::pending::<Result<Vec<Dish>, ProviderError>>())
        }
    }

    #[tokio::test]
    async fn test_stalled_search_times_out() {
        let provider = WithTimeout::new(NeverProvider, Duration::from_millis(20));
        let result = provider.search(&Query::default(), 1).await;
        assert_eq!(result, Err(ProviderError::Timeout { after_ms: 20 }));
    }

    #[tokio::test]
    async fn test_fast_search_passes_through() {
        let provider = WithTimeout::new(StubProvider::default(), Duration::from_secs(5));
        let dishes = provider.search(&Query::default(), 1).await.unwrap();
        assert_eq!(dishes.len(), 1);
    }
}

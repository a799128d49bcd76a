//! Fixed single-result provider.
//!
//! Returns the same one dish for the first page of any query and nothing
//! after it. Useful for screens that need a list before a real backend is
//! reachable.

use super::{SearchProvider, SearchResult};
use crate::domain::{Canteen, Dish, ProviderError, Query};
use futures_util::future::BoxFuture;

#[derive(Debug, Clone)]
pub struct StubProvider {
    dish: Dish,
}

impl Default for StubProvider {
    fn default() -> Self {
        Self {
            dish: Dish {
                id: 1,
                name: "番茄炒蛋".to_string(),
                price: 3,
                canteen: Canteen::JiaYuan1,
                calorie: 32,
                rate: 4.0,
                rate_number: 1333,
                picture_url: "/images/dishitem/example.png".to_string(),
            },
        }
    }
}

impl StubProvider {
    /// A stub that serves `dish` instead of the built-in one.
    #[must_use]
    pub const fn with_dish(dish: Dish) -> Self {
        Self { dish }
    }
}

impl SearchProvider for StubProvider {
    fn search(&self, query: &Query, page: u32) -> BoxFuture<'static, SearchResult> {
        tracing::debug!(page, has_name = query.name_filter().is_some(), "stub search");

        let result = match page {
            0 => Err(ProviderError::Rejected("pages are 1-based".to_string())),
            1 => Ok(vec![self.dish.clone()]),
            _ => Ok(Vec::new()),
        };
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_page_has_the_fixed_dish() {
        let provider = StubProvider::default();
        let dishes = provider.search(&Query::default(), 1).await.unwrap();
        assert_eq!(dishes.len(), 1);
        assert_eq!(dishes[0].name, "番茄炒蛋");
        assert_eq!(dishes[0].canteen, Canteen::JiaYuan1);
    }

    #[tokio::test]
    async fn test_later_pages_are_empty() {
        let provider = StubProvider::default();
        assert!(provider.search(&Query::default(), 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_page_zero_is_rejected() {
        let provider = StubProvider::with_dish(Dish::new(9, "凉面", 6, Canteen::XueYi));
        assert!(matches!(
            provider.search(&Query::default(), 0).await,
            Err(ProviderError::Rejected(_))
        ));
    }
}

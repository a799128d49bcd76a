//! Search provider and navigation collaborators.
//!
//! The list controller is transport agnostic. Everything it needs from the
//! outside world goes through two traits:
//!
//! - [`SearchProvider`]: fetches one 1-based page of dishes for a query. An
//!   empty page means there is nothing further; no total count is reported.
//! - [`DetailNavigator`]: opens the detail/review screen for a dish and
//!   resolves to the edited dish, if the user changed anything.
//!
//! # Implementations
//!
//! - [`CatalogProvider`]: in-memory catalog with full filter support
//! - [`StubProvider`]: a single fixed dish, for wiring up screens
//! - [`WithTimeout`]: deadline wrapper around any provider
//!
//! # Modules
//!
//! - `messages`: Request/ticket protocol with trace context propagation
//! - `catalog`: JSON-backed in-memory catalog
//! - `stub`: Fixed single-result provider
//! - `timeout`: Deadline enforcement

pub mod catalog;
pub mod messages;
pub mod stub;
pub mod timeout;

pub use catalog::{CatalogEntry, CatalogProvider};
pub use messages::{FetchKind, FetchTicket, SearchRequest, TraceContext};
pub use stub::StubProvider;
pub use timeout::WithTimeout;

use crate::domain::{Dish, ProviderError, Query};
use futures_util::future::BoxFuture;
use std::sync::Arc;

/// Result of one provider call.
pub type SearchResult = Result<Vec<Dish>, ProviderError>;

/// Source of paginated dish search results.
///
/// The returned future owns everything it needs, so several searches may be
/// in flight at once and settle in any order.
pub trait SearchProvider: Send + Sync {
    /// Fetches `page` (1-based) of the dishes matching `query`.
    ///
    /// # Errors
    ///
    /// Resolves to a [`ProviderError`] on timeout, transport failure, an
    /// undecodable response or a rejected request.
    fn search(&self, query: &Query, page: u32) -> BoxFuture<'static, SearchResult>;
}

impl<P: SearchProvider + ?Sized> SearchProvider for Box<P> {
    fn search(&self, query: &Query, page: u32) -> BoxFuture<'static, SearchResult> {
        (**self).search(query, page)
    }
}

impl<P: SearchProvider + ?Sized> SearchProvider for Arc<P> {
    fn search(&self, query: &Query, page: u32) -> BoxFuture<'static, SearchResult> {
        (**self).search(query, page)
    }
}

/// Opens the detail screen for a dish.
///
/// Resolves once the detail screen is closed, carrying the replacement dish
/// when the user changed it (for example by posting a review).
pub trait DetailNavigator: Send + Sync {
    fn open(&self, dish: Dish) -> BoxFuture<'static, Option<Dish>>;
}

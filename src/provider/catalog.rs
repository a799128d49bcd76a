//! In-memory dish catalog provider.
//!
//! Holds the whole catalog in memory and answers searches by filtering and
//! slicing it. The catalog is read once from a JSON file:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "name": "番茄炒蛋",
//!     "price": 3,
//!     "canteen": "JiaYuan1",
//!     "calorie": 32,
//!     "rate": 4.0,
//!     "rate_number": 1333,
//!     "picture_url": "/images/dishitem/example.png",
//!     "category": "home-style",
//!     "flavors": ["Sweet", "Sour"],
//!     "ingredients": ["tomato", "egg"],
//!     "wait_time": 3
//!   }
//! ]
//! ```
//!
//! # Matching
//!
//! The free-text filter is split on whitespace and every token must fuzzy
//! match the lowercased dish name. All other filters are exact: category and
//! canteen equality, flavor membership, inclusive price range, calorie and
//! wait-time ceilings, and containment of every requested ingredient.
//! Results keep catalog order so pages never overlap.

use super::{SearchProvider, SearchResult};
use crate::domain::error::{DishlistError, Result};
use crate::domain::{CategoryId, Dish, Flavor, ProviderError, Query};
use futures_util::future::BoxFuture;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Default number of dishes per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One catalog record: the dish as listed plus the attributes filters look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub dish: Dish,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(default)]
    pub flavors: Vec<Flavor>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Typical queueing time in minutes.
    #[serde(default)]
    pub wait_time: u32,
}

impl CatalogEntry {
    /// Wraps a dish with no category, flavors or ingredients.
    #[must_use]
    pub const fn new(dish: Dish) -> Self {
        Self {
            dish,
            category: None,
            flavors: Vec::new(),
            ingredients: Vec::new(),
            wait_time: 0,
        }
    }

    /// Checks every structured filter of `query` except the free-text name.
    fn passes_filters(&self, query: &Query) -> bool {
        if query.category.is_some() && self.category != query.category {
            return false;
        }
        if query.canteen.is_some_and(|c| c != self.dish.canteen) {
            return false;
        }
        if query.flavor.is_some_and(|f| !self.flavors.contains(&f)) {
            return false;
        }
        if query.price.is_some_and(|range| !range.contains(self.dish.price)) {
            return false;
        }
        if query.max_calorie.is_some_and(|max| self.dish.calorie > max) {
            return false;
        }
        if query.max_wait_time.is_some_and(|max| self.wait_time > max) {
            return false;
        }
        query.ingredients.iter().all(|wanted| {
            self.ingredients
                .iter()
                .any(|have| have.eq_ignore_ascii_case(wanted))
        })
    }
}

/// Search provider over an in-memory catalog.
///
/// Cloning is cheap; clones share the catalog.
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    entries: Arc<Vec<CatalogEntry>>,
    page_size: usize,
}

impl CatalogProvider {
    /// Builds a provider from entries already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`DishlistError::Catalog`] if two entries share a dish id or
    /// `page_size` is zero.
    pub fn from_entries(entries: Vec<CatalogEntry>, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(DishlistError::Catalog("page size must be positive".to_string()));
        }

        let mut seen = HashSet::with_capacity(entries.len());
        if let Some(dup) = entries.iter().find(|e| !seen.insert(e.dish.id)) {
            return Err(DishlistError::Catalog(format!(
                "duplicate dish id {}",
                dup.dish.id
            )));
        }

        tracing::debug!(entries = entries.len(), page_size, "catalog loaded");

        Ok(Self {
            entries: Arc::new(entries),
            page_size,
        })
    }

    /// Loads a catalog from a JSON array file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a valid catalog,
    /// or fails the checks of [`CatalogProvider::from_entries`].
    pub fn from_file(path: impl AsRef<Path>, page_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let _span = tracing::debug_span!("catalog_from_file", path = ?path).entered();

        let contents = std::fs::read_to_string(path)?;
        let entries: Vec<CatalogEntry> = serde_json::from_str(&contents)
            .map_err(|e| DishlistError::Catalog(format!("failed to parse {}: {e}", path.display())))?;

        Self::from_entries(entries, page_size)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every dish matching `query`, in catalog order.
    #[must_use]
    pub fn matching(&self, query: &Query) -> Vec<&CatalogEntry> {
        let tokens: Vec<String> = query
            .name_filter()
            .map(|name| name.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default();

        let matcher = if tokens.is_empty() {
            None
        } else {
            Some(SkimMatcherV2::default())
        };

        self.entries
            .iter()
            .filter(|entry| entry.passes_filters(query))
            .filter(|entry| {
                matcher.as_ref().map_or(true, |m| {
                    let name = entry.dish.name.to_lowercase();
                    tokens.iter().all(|token| m.fuzzy_match(&name, token).is_some())
                })
            })
            .collect()
    }

    /// Slices one page out of the matching dishes.
    fn page(&self, query: &Query, page: u32) -> SearchResult {
        let index = usize::try_from(page)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .ok_or_else(|| ProviderError::Rejected("pages are 1-based".to_string()))?;

        let matching = self.matching(query);
        let start = index.saturating_mul(self.page_size);

        let dishes: Vec<Dish> = matching
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .map(|entry| entry.dish.clone())
            .collect();

        tracing::debug!(page, returned = dishes.len(), "catalog page served");
        Ok(dishes)
    }
}

impl SearchProvider for CatalogProvider {
    fn search(&self, query: &Query, page: u32) -> BoxFuture<'static, SearchResult> {
        let _span = tracing::debug_span!("catalog_search", page, query = ?query).entered();
        Box::pin(std::future::ready(self.page(query, page)))
    }
}

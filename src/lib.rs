//! Dishlist: a filterable, paginated dish list for a campus canteen app.
//!
//! The crate provides:
//! - A sans-IO list controller with page cursor, loading guard and
//!   end-of-results detection
//! - Latest-intent-wins handling of out-of-order search completions
//! - Cross-screen filter hand-off and in-place updates from the detail screen
//! - Pluggable search providers (JSON catalog, fixed stub, timeout wrapper)
//! - An async session driving the controller against a provider
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs)                                      │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← Async driver
//! │  - Executes actions against provider / navigator    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Epoch-guarded list controller                    │
//! │  - Pending filter hand-off                          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Providers     │   │ Observability │
//! │ (ui/)         │   │ (provider/)   │   │ (tracing,     │
//! │ - View model  │   │ - Catalog     │   │  OpenTelemetry│
//! │ - Text render │   │ - Stub        │   │  file export) │
//! │               │   │ - Timeout     │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Dish, Query, FilterEdit, errors (domain/)        │
//! │  - Path expansion (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Controller, event handler and actions
//! - [`domain`]: Dishes, queries and error types
//! - [`provider`]: Search provider trait and implementations
//! - [`runtime`]: Async list session
//! - [`ui`]: View model and text rendering
//! - [`infrastructure`]: Path utilities
//! - [`observability`]: Tracing setup
//!
//! # Configuration
//!
//! ```toml
//! # dishlist.toml
//! catalog_path = "~/canteen/catalog.json"
//! page_size = 10
//! search_timeout_ms = 3000
//! trace_level = "debug"
//! trace_file = "~/.local/share/dishlist/trace.jsonl"
//! ```
//!
//! # Example
//!
//! ```rust
//! use dishlist::{Config, Outcome};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let session = dishlist::initialize(&Config::default())?;
//! let Outcome::Applied(state) = session.mount().await else {
//!     panic!("first page should load");
//! };
//! assert_eq!(state.items.len(), 1);
//! # Ok::<(), dishlist::DishlistError>(())
//! # }).unwrap();
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod provider;
pub mod runtime;
pub mod ui;

pub use app::{handle_event, Action, Event, ListController, ListState, PendingFilter};
pub use domain::{
    Canteen, CategoryId, Dish, DishId, DishlistError, FilterEdit, Flavor, PriceRange,
    ProviderError, Query, Result,
};
pub use provider::{CatalogProvider, SearchProvider, StubProvider, WithTimeout};
pub use runtime::{ListSession, Notice, Outcome};

use infrastructure::expand_tilde;
use provider::catalog::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration.
///
/// Read from a TOML file with [`Config::from_file`] or from a flat string
/// map with [`Config::from_map`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON catalog to search. The built-in stub provider is used when unset.
    pub catalog_path: Option<PathBuf>,

    /// Dishes per page served by the catalog. Default: 10
    pub page_size: usize,

    /// Fail searches that take longer than this. No deadline when unset.
    pub search_timeout_ms: Option<u64>,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Export spans as JSON lines to this file.
    pub trace_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            page_size: DEFAULT_PAGE_SIZE,
            search_timeout_ms: None,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a string map, falling back to the default
    /// for every missing or unparsable value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use dishlist::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "20".to_string());
    /// map.insert("search_timeout_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 20);
    /// assert_eq!(config.search_timeout_ms, None);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let page_size = non_empty("page_size")
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self {
            catalog_path: non_empty("catalog_path").map(expand_tilde),
            page_size,
            search_timeout_ms: non_empty("search_timeout_ms").and_then(|s| s.parse().ok()),
            trace_level: non_empty("trace_level").map(String::from),
            trace_file: non_empty("trace_file").map(expand_tilde),
        }
    }

    /// Reads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DishlistError::Io`] if the file cannot be read and
    /// [`DishlistError::Config`] if it is not valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)
            .map_err(|e| DishlistError::Config(format!("{}: {e}", path.display())))?;

        if config.page_size == 0 {
            return Err(DishlistError::Config(format!(
                "{}: page_size must be positive",
                path.display()
            )));
        }

        config.catalog_path = config.catalog_path.map(|p| expand_tilde(&p.to_string_lossy()));
        config.trace_file = config.trace_file.map(|p| expand_tilde(&p.to_string_lossy()));
        Ok(config)
    }

    /// Builds the configured search provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog file cannot be loaded.
    pub fn build_provider(&self) -> Result<Box<dyn SearchProvider>> {
        let provider: Box<dyn SearchProvider> = match &self.catalog_path {
            Some(path) => {
                let catalog = CatalogProvider::from_file(path, self.page_size)?;
                if catalog.is_empty() {
                    tracing::warn!(path = %path.display(), "catalog has no dishes");
                } else {
                    tracing::debug!(path = %path.display(), dishes = catalog.len(), "catalog loaded");
                }
                Box::new(catalog)
            }
            None => {
                tracing::debug!("no catalog configured, using stub provider");
                Box::new(StubProvider::default())
            }
        };

        Ok(match self.search_timeout_ms {
            Some(ms) => Box::new(WithTimeout::new(provider, Duration::from_millis(ms))),
            None => provider,
        })
    }
}

/// Creates a list session for the configured provider.
///
/// Does not install tracing; call [`observability::init_tracing`] first if
/// logs are wanted.
///
/// # Errors
///
/// Returns an error if the provider cannot be built.
pub fn initialize(config: &Config) -> Result<ListSession<Box<dyn SearchProvider>>> {
    tracing::debug!(?config, "initializing dish list");
    let provider = config.build_provider()?;
    Ok(ListSession::new(provider, PendingFilter::new()))
}

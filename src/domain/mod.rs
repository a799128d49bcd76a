//! Domain layer: dishes, filter criteria and error types.
//!
//! Nothing in here knows about fetching, pagination or rendering.
//!
//! - [`error`]: Error types and result aliases
//! - [`dish`]: The result row model
//! - [`query`]: Filter criteria and selector edits
//!
//! # Examples
//!
//! ```
//! use dishlist::domain::{Canteen, FilterEdit, Flavor, Query};
//!
//! let query = Query::for_canteen(Canteen::XueYi)
//!     .apply(FilterEdit::Flavor(Some(Flavor::Sour)));
//! assert_eq!(query.flavor, Some(Flavor::Sour));
//! ```

pub mod dish;
pub mod error;
pub mod query;

pub use dish::{Dish, DishId};
pub use error::{DishlistError, ProviderError, Result};
pub use query::{Canteen, CategoryId, FilterEdit, Flavor, PriceRange, Query};

//! Presentation layer for the dish list.
//!
//! ```text
//! ListState → ListViewModel::from_state → ListViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready rows and indicator flags
//! - [`renderer`]: Plain-text terminal rendering

pub mod renderer;
pub mod viewmodel;

pub use renderer::render;
pub use viewmodel::{DishRow, EmptyState, ListViewModel};

//! Application layer: list state, the controller that owns it, and the
//! event handler that drives the controller.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Screen Events → Event Handler → Controller → State Mutations → Actions
//!                      ↑                                            ↓
//!                      └──────────── Search Completions ────────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`controller`]: Epoch-guarded owner of the list state
//! - [`handler`]: Event processing and state transition coordinator
//! - [`pending`]: Cross-screen filter hand-off slot
//! - [`state`]: List state container and view model entry point

pub mod actions;
pub mod controller;
pub mod handler;
pub mod pending;
pub mod state;

pub use actions::Action;
pub use controller::{Completion, ListController};
pub use handler::{handle_event, Event};
pub use pending::PendingFilter;
pub use state::ListState;

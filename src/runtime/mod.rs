//! Async runtime glue around the sans-IO controller.
//!
//! - [`session`]: `ListSession`, which runs searches and navigation for one screen

pub mod session;

pub use session::{ListSession, Notice, Outcome};

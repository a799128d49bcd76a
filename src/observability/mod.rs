//! Structured logging and OpenTelemetry tracing.
//!
//! ```text
//! tracing macros ─┬─► fmt layer ─────────────────────────────► stderr
//!                 └─► tracing-opentelemetry ─► SDK ─► exporter ─► trace file
//! ```
//!
//! The file branch is only installed when `trace_file` is configured. The
//! file is rotated at 10 MiB with three numbered backups.
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with the file exporter
//! - [`span_formatter`]: Per-span JSON records
//! - [`file_writer`]: Size-rotated line writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;

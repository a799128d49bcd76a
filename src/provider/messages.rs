//! Search request protocol between the list controller and its provider.
//!
//! The controller never calls a provider itself. Each fetch it wants is
//! described by a [`SearchRequest`] whose [`FetchTicket`] must be handed back
//! together with the result. The ticket is how late completions are told
//! apart from the one the controller is still waiting for.

use crate::domain::Query;

/// Distributed tracing context captured when a request is issued.
///
/// The fetch itself runs later, after the issuing span has closed, so the
/// ids are carried along and re-attached as the remote parent of the fetch
/// span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the issuing span as a hex string.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry ids of the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span is
    /// not sampled.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }

    /// Rebuilds an OpenTelemetry context whose remote parent is the issuing span.
    ///
    /// Returns `None` if the stored ids do not parse.
    #[must_use]
    pub fn to_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;
        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(opentelemetry::Context::new().with_remote_span_context(span_context))
    }
}

/// What a completed fetch does to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    /// First page after a filter change; replaces the list.
    Reset,
    /// First page after pull-to-refresh; replaces the list and releases the
    /// refresh indicator.
    Refresh,
    /// Next page for infinite scroll; appends to the list.
    Append,
}

/// Identity of one issued fetch.
///
/// `epoch` is the controller's filter epoch at issue time; `page` is the
/// 1-based page requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub epoch: u64,
    pub page: u32,
    pub kind: FetchKind,
}

/// A fetch the controller wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: FetchTicket,
    pub query: Query,
    pub trace_context: Option<TraceContext>,
}

impl SearchRequest {
    /// Builds a request, capturing the current trace context.
    #[must_use]
    pub fn new(ticket: FetchTicket, query: Query) -> Self {
        Self {
            ticket,
            query,
            trace_context: TraceContext::from_current(),
        }
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.ticket.page
    }
}

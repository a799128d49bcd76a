//! One-line JSON records for finished spans.
//!
//! Each exported span becomes a flat object, easy to `grep` or feed to `jq`:
//!
//! ```json
//! {"service":"dishlist","trace_id":"…","span_id":"…","parent_span_id":"…",
//!  "name":"search","start":"2026-10-16T09:12:03.120Z","duration_ms":41.7,
//!  "attributes":{"epoch":3,"page":1,"kind":"Reset"},"events":[…],"status":"unset"}
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::time::SystemTime;

#[derive(Debug, Serialize)]
struct SpanRecord<'a> {
    service: &'a str,
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_span_id: Option<String>,
    name: &'a str,
    start: String,
    duration_ms: f64,
    attributes: Map<String, JsonValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<EventRecord<'a>>,
    status: String,
}

#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    name: &'a str,
    at: String,
    attributes: Map<String, JsonValue>,
}

/// Serializes finished spans for the file exporter.
#[derive(Debug, Clone)]
pub struct SpanFormatter {
    service: String,
}

impl SpanFormatter {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Formats one span as a single JSON line.
    pub fn format_span(&self, span: &SpanData) -> String {
        let duration_ms = span
            .end_time
            .duration_since(span.start_time)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);

        let record = SpanRecord {
            service: &self.service,
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id: (span.parent_span_id != SpanId::INVALID)
                .then(|| format!("{:016x}", span.parent_span_id)),
            name: &span.name,
            start: timestamp(span.start_time),
            duration_ms,
            attributes: attributes_to_map(&span.attributes),
            events: span
                .events
                .iter()
                .map(|event| EventRecord {
                    name: &event.name,
                    at: timestamp(event.timestamp),
                    attributes: attributes_to_map(&event.attributes),
                })
                .collect(),
            status: status_label(&span.status),
        };

        serde_json::to_string(&record).unwrap_or_else(|e| {
            format!("{{\"service\":{:?},\"format_error\":{:?}}}", self.service, e.to_string())
        })
    }
}

fn timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn status_label(status: &Status) -> String {
    match status {
        Status::Unset => "unset".to_string(),
        Status::Ok => "ok".to_string(),
        Status::Error { description } => format!("error: {description}"),
    }
}

fn attributes_to_map(attributes: &[KeyValue]) -> Map<String, JsonValue> {
    attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect()
}

/// Maps an attribute onto the closest JSON type; arrays fall back to text.
fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::I64(i) => JsonValue::from(*i),
        Value::F64(f) => serde_json::Number::from_f64(*f)
            .map_or_else(|| JsonValue::String(f.to_string()), JsonValue::Number),
        Value::String(s) => JsonValue::String(s.to_string()),
        Value::Array(_) => JsonValue::String(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_values_keep_json_types() {
        let map = attributes_to_map(&[
            KeyValue::new("epoch", 3_i64),
            KeyValue::new("stale", true),
            KeyValue::new("kind", "Append"),
            KeyValue::new("ratio", 0.5),
        ]);
        assert_eq!(
            JsonValue::Object(map),
            serde_json::json!({"epoch": 3, "stale": true, "kind": "Append", "ratio": 0.5})
        );
    }

    #[test]
    fn test_non_finite_float_becomes_text() {
        assert_eq!(attribute_value(&Value::F64(f64::NAN)), JsonValue::String("NaN".into()));
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(&Status::Unset), "unset");
        assert_eq!(status_label(&Status::error("boom")), "error: boom");
    }
}

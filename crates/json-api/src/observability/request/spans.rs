//! Route templates for span names, metric labels and request logs.
//!
//! Identifiers and secrets in the path are replaced by placeholders so label
//! cardinality stays bounded and reset tokens never reach logs or traces.

use uuid::Uuid;

use mercado_app::domain::tickets::code::TICKET_CODE_PREFIX;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) route: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let route = route_template(path);
    let otel_span_name = format!("{method} {route}");

    RequestSpanName {
        route,
        otel_span_name,
    }
}

fn route_template(path: &str) -> String {
    let mut segments = Vec::new();
    let mut previous = "";

    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        segments.push(placeholder(previous, segment).unwrap_or(segment));
        previous = segment;
    }

    format!("/{}", segments.join("/"))
}

fn placeholder(previous: &str, segment: &str) -> Option<&'static str> {
    if previous == "verify" {
        Some("{token}")
    } else if Uuid::parse_str(segment).is_ok() {
        Some("{uuid}")
    } else if previous == "code" || segment.starts_with(TICKET_CODE_PREFIX) {
        Some("{code}")
    } else {
        None
    }
}

use serde_json::Value;
use tracing::warn;

use crate::config::definition::{EndpointDefinition, ResponseCandidate};

use super::canonical::to_canonical_string;

/// Picks the response to send for one request.
///
/// Tiers, in order:
/// 1. an empty response list resolves to nothing;
/// 2. a positive `desired_status` returns the first candidate with that
///    status, ignoring the body entirely;
/// 3. `GET` endpoints and requests without a body get the first candidate;
/// 4. otherwise the first candidate whose `input_body` canonically equals the
///    request body wins;
/// 5. failing that, the last candidate is the default.
///
/// An override that matches no candidate is logged and resolution continues
/// at tier 3.
pub fn resolve<'a>(
    definition: &'a EndpointDefinition,
    request_body: Option<&Value>,
    desired_status: Option<i64>,
) -> Option<&'a ResponseCandidate> {
    let responses = &definition.responses;
    if responses.is_empty() {
        return None;
    }

    if let Some(status) = desired_status.filter(|s| *s > 0) {
        if let Some(found) = responses.iter().find(|r| i64::from(r.status) == status) {
            return Some(found);
        }
        warn!(desired_status = status, "no response configured for desired status code");
    }

    let body = request_body.filter(|b| !b.is_null());
    let body = match body {
        Some(body) if definition.method != "GET" => body,
        _ => return responses.first(),
    };

    let wanted = to_canonical_string(body);
    responses
        .iter()
        .find(|r| {
            r.expected_input()
                .is_some_and(|expected| to_canonical_string(expected) == wanted)
        })
        .or_else(|| responses.last())
}

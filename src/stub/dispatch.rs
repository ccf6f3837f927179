use serde_json::Value;
use tracing::{debug, error};

use crate::config::registry::Registry;

use super::{resolver::resolve, StubError, StubResponse};

/// Parses a request payload. An empty payload means "no body".
pub fn parse_body(raw: &[u8]) -> Result<Option<Value>, StubError> {
    if raw.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(StubError::InvalidBody)
}

/// Reads the status override header value. Anything that is not an integer
/// is treated as no override.
pub fn parse_status_override(header: Option<&str>) -> Option<i64> {
    header.and_then(|v| v.trim().parse::<i64>().ok())
}

/// Answers one mock request against the registry.
pub fn handle(
    registry: &Registry,
    method: &str,
    path: &str,
    body: &[u8],
    status_header: Option<&str>,
) -> Result<StubResponse, StubError> {
    let definition = registry.get(path).ok_or_else(|| {
        debug!(%path, "no endpoint registered for path");
        StubError::NotFound
    })?;

    if definition.method != method {
        debug!(%path, expected_method = %definition.method, actual_method = %method, "method mismatch");
        return Err(StubError::NotFound);
    }

    let input_body = parse_body(body)?;
    debug!(%path, input_body = ?input_body, "request body parsed");

    let desired_status = parse_status_override(status_header);
    if let Some(status) = desired_status {
        debug!(status, "using status code from header");
    }

    let candidate = resolve(definition, input_body.as_ref(), desired_status).ok_or_else(|| {
        error!(%path, "endpoint has no configured responses");
        StubError::NoMatchingResponse
    })?;

    debug!(%path, status = candidate.status, "found matching response");
    Ok(StubResponse {
        status: candidate.status,
        body: candidate.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::definition::{EndpointDefinition, ResponseCandidate};
    use serde_json::json;

    fn registry() -> Registry {
        [
            (
                "/users".to_string(),
                EndpointDefinition {
                    method: "GET".to_string(),
                    responses: vec![
                        ResponseCandidate::new(200, json!({"users": [{"id": 1, "name": "Test User"}]})),
                        ResponseCandidate::new(401, json!({"error": "Unauthorized"})),
                        ResponseCandidate::new(403, json!({"error": "Forbidden"})),
                    ],
                },
            ),
            (
                "/create-user".to_string(),
                EndpointDefinition {
                    method: "POST".to_string(),
                    responses: vec![
                        ResponseCandidate::new(201, json!({"message": "Success"}))
                            .with_input(json!({"name": "Test User", "email": "test@example.com"})),
                        ResponseCandidate::new(400, json!({"error": "Invalid input"}))
                            .with_input(json!({"name": "Test User"})),
                        ResponseCandidate::new(409, json!({"error": "User already exists"})),
                    ],
                },
            ),
            (
                "/broken".to_string(),
                EndpointDefinition {
                    method: "POST".to_string(),
                    responses: vec![],
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn serves_default_response() {
        let res = handle(&registry(), "GET", "/users", b"", None).unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!({"users": [{"id": 1, "name": "Test User"}]}));
    }

    #[test]
    fn matches_post_body() {
        let body = br#"{"email": "test@example.com", "name": "Test User"}"#;
        let res = handle(&registry(), "POST", "/create-user", body, None).unwrap();
        assert_eq!(res.status, 201);

        let res = handle(&registry(), "POST", "/create-user", br#"{"name":"Test User"}"#, None).unwrap();
        assert_eq!(res.status, 400);
        assert_eq!(res.body, json!({"error": "Invalid input"}));
    }

    #[test]
    fn header_forces_status() {
        let res = handle(&registry(), "GET", "/users", b"", Some("401")).unwrap();
        assert_eq!(res.status, 401);

        let body = br#"{"name": "Test User", "email": "test@example.com"}"#;
        let res = handle(&registry(), "POST", "/create-user", body, Some(" 409 ")).unwrap();
        assert_eq!(res.status, 409);
        assert_eq!(res.body, json!({"error": "User already exists"}));
    }

    #[test]
    fn unknown_or_invalid_header_is_ignored() {
        for header in [Some("404"), Some("invalid"), Some(""), Some("-1"), None] {
            let res = handle(&registry(), "GET", "/users", b"", header).unwrap();
            assert_eq!(res.status, 200, "header {:?}", header);
        }
    }

    #[test]
    fn unknown_path_and_wrong_method_are_not_found() {
        let err = handle(&registry(), "GET", "/not-found", b"", None).unwrap_err();
        assert!(matches!(err, StubError::NotFound));

        let err = handle(&registry(), "POST", "/users", b"", None).unwrap_err();
        assert!(matches!(err, StubError::NotFound));

        let err = handle(&registry(), "get", "/users", b"", None).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn malformed_body_is_rejected() {
        let err = handle(&registry(), "POST", "/create-user", b"invalid json", None).unwrap_err();
        assert!(matches!(err, StubError::InvalidBody(_)));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid JSON in request body");
    }

    #[test]
    fn empty_responses_is_internal_failure() {
        let err = handle(&registry(), "POST", "/broken", br#"{"a":1}"#, None).unwrap_err();
        assert!(matches!(err, StubError::NoMatchingResponse));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn empty_body_is_no_body() {
        assert!(parse_body(b"").unwrap().is_none());
        assert_eq!(parse_body(b"null").unwrap(), Some(Value::Null));
        assert!(parse_body(b"   ").is_err());
    }

    #[test]
    fn status_override_parsing() {
        assert_eq!(parse_status_override(Some("201")), Some(201));
        assert_eq!(parse_status_override(Some("+201")), Some(201));
        assert_eq!(parse_status_override(Some("2x1")), None);
        assert_eq!(parse_status_override(None), None);
    }
}

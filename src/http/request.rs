use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names are lower-cased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Position just past the blank line ending the header section.
pub fn header_end(data: &[u8]) -> Option<usize> {
    data.windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|idx| idx + 4)
}

/// Content-Length declared in a raw header section, zero when absent.
/// A value that is not a non-negative integer is returned as the error.
pub fn content_length(head: &str) -> Result<usize, String> {
    let declared = head
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("Content-Length"));
    match declared {
        Some((_, value)) => value.trim().parse::<usize>().map_err(|_| value.trim().to_string()),
        None => Ok(0),
    }
}

pub fn parse_http_request(buffer: &[u8]) -> Request {
    let body_start = header_end(buffer).unwrap_or(buffer.len());
    let head = String::from_utf8_lossy(&buffer[..body_start]);

    // Split into lines. The first line is the request line.
    let mut lines = head.lines();
    let request_line = lines.next().unwrap_or("");

    // Parse request line (e.g., "GET /path?query=val HTTP/1.1")
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("/");

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((key, value)) = line.split_once(':') {
            headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let declared = content_length(&head).unwrap_or(0);
    let available = &buffer[body_start..];
    let body = available[..declared.min(available.len())].to_vec();

    trace!(%method, %path, ?headers, body_len = body.len(), "parsed request");

    Request {
        method,
        path,
        query,
        headers,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_line_headers_and_body() {
        let raw = b"POST /create-user?debug=1 HTTP/1.1\r\nHost: localhost\r\nX-Stub-Status: 409\r\nContent-Length: 13\r\n\r\n{\"name\":\"A\"}";
        let req = parse_http_request(raw);
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/create-user");
        assert_eq!(req.query.as_deref(), Some("debug=1"));
        assert_eq!(req.header("x-stub-status"), Some("409"));
        assert_eq!(req.header("HOST"), Some("localhost"));
        assert_eq!(req.body, b"{\"name\":\"A\"}");
    }

    #[test]
    fn body_without_content_length_is_empty() {
        let raw = b"GET /users HTTP/1.1\r\nHost: x\r\n\r\n";
        let req = parse_http_request(raw);
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/users");
        assert!(req.query.is_none());
        assert!(req.body.is_empty());
    }

    #[test]
    fn body_is_truncated_to_content_length() {
        let raw = b"PUT /a HTTP/1.1\r\nContent-Length: 2\r\n\r\n{}trailing";
        assert_eq!(parse_http_request(raw).body, b"{}");
    }

    #[test]
    fn header_end_and_length_helpers() {
        let raw = b"GET / HTTP/1.1\r\ncontent-length: 7\r\n\r\nbody";
        assert_eq!(header_end(raw), Some(raw.len() - 4));
        assert_eq!(content_length("GET / HTTP/1.1\r\ncontent-length: 7"), Ok(7));
        assert_eq!(content_length("GET / HTTP/1.1\r\nHost: x"), Ok(0));
        assert_eq!(
            content_length("GET / HTTP/1.1\r\nContent-Length: nope"),
            Err("nope".to_string())
        );
        assert!(content_length("GET / HTTP/1.1\r\nContent-Length: -5").is_err());
        assert!(content_length("GET / HTTP/1.1\r\nContent-Length: 99999999999999999999999").is_err());
        assert_eq!(header_end(b"GET / HTTP/1.1\r\n"), None);
    }
}

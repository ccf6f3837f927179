use std::{net::SocketAddr, sync::Arc, time::Instant};

use serde::Serialize;
use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{error, info, trace, warn};

use crate::config::registry::Registry;
use crate::stub::{catalogue::catalogue, dispatch, StubError, STATUS_OVERRIDE_HEADER};

use super::request::{content_length, header_end, parse_http_request, Request};
use super::router::{find_route, Route};

const MAX_HEADER_BYTES: usize = 64 * 1024;
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

const CORS_HEADERS: &str = "Access-Control-Allow-Origin: *\r\n\
Access-Control-Allow-Methods: GET, POST, PUT, PATCH, DELETE, OPTIONS\r\n\
Access-Control-Allow-Headers: *\r\n\
Access-Control-Allow-Credentials: true\r\n";

fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        418 => "I'm a teapot",
        422 => "Unprocessable Entity",
        423 => "Locked",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        _ => "Unknown",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    fn empty(status: u16) -> Self {
        HttpResponse {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    fn text(status: u16, message: &str) -> Self {
        HttpResponse {
            status,
            content_type: Some("text/plain; charset=utf-8"),
            body: format!("{}\n", message).into_bytes(),
        }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(mut body) => {
                body.push(b'\n');
                HttpResponse {
                    status,
                    content_type: Some("application/json"),
                    body,
                }
            }
            Err(e) => {
                error!(error = %e, "failed to encode response");
                HttpResponse::text(500, "Internal Server Error")
            }
        }
    }

    pub fn to_bytes(&self, cors: bool) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        if cors {
            head.push_str(CORS_HEADERS);
        }
        if let Some(content_type) = self.content_type {
            head.push_str(&format!("Content-Type: {}\r\n", content_type));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

/// Maps a parsed request to its response.
pub fn respond(registry: &Registry, req: &Request, cors: bool) -> HttpResponse {
    match find_route(&req.method, &req.path, cors) {
        Route::Preflight => HttpResponse::empty(204),
        Route::Catalogue => {
            let listing = catalogue(registry);
            HttpResponse::json(200, &listing)
        }
        Route::CatalogueMethodNotAllowed => {
            warn!(method = %req.method, "invalid method for endpoints list");
            HttpResponse::text(405, "Method not allowed")
        }
        Route::Stub => {
            let result = dispatch::handle(
                registry,
                &req.method,
                &req.path,
                &req.body,
                req.header(STATUS_OVERRIDE_HEADER),
            );
            match result {
                Ok(stub) => HttpResponse::json(stub.status, &stub.body),
                Err(err) => {
                    match &err {
                        StubError::NotFound => {
                            warn!(method = %req.method, path = %req.path, "mock response not found")
                        }
                        StubError::InvalidBody(e) => {
                            warn!(path = %req.path, error = %e, "failed to parse request body")
                        }
                        StubError::NoMatchingResponse => {
                            error!(path = %req.path, "no matching response found")
                        }
                    }
                    HttpResponse::text(err.status_code(), &err.to_string())
                }
            }
        }
    }
}

/// Outcome of reading one request off the socket.
#[derive(Debug)]
enum Incoming {
    Request(Vec<u8>),
    /// The request was refused before its body was read.
    Rejected(HttpResponse),
    Closed,
}

async fn read_http_request(stream: &mut TcpStream) -> io::Result<Incoming> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    // Read until we find the header terminator.
    let body_start = loop {
        if let Some(end) = header_end(&data) {
            break end;
        }
        if data.len() > MAX_HEADER_BYTES {
            return Ok(Incoming::Rejected(HttpResponse::text(431, "Request header too large")));
        }
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(if data.is_empty() {
                Incoming::Closed
            } else {
                Incoming::Request(data)
            });
        }
        data.extend_from_slice(&buf[..n]);
    };

    let head = String::from_utf8_lossy(&data[..body_start]).to_string();
    let declared = match content_length(&head) {
        Ok(len) => len,
        Err(value) => {
            warn!(%value, "invalid Content-Length");
            return Ok(Incoming::Rejected(HttpResponse::text(400, "Invalid Content-Length")));
        }
    };
    let wanted = match body_start.checked_add(declared) {
        Some(wanted) if declared <= MAX_BODY_BYTES => wanted,
        _ => {
            warn!(declared, limit = MAX_BODY_BYTES, "request body too large");
            return Ok(Incoming::Rejected(HttpResponse::text(413, "Payload Too Large")));
        }
    };

    while data.len() < wanted {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before the declared body was received",
            ));
        }
        data.extend_from_slice(&buf[..n]);
    }
    Ok(Incoming::Request(data))
}

pub async fn handle_client(
    mut stream: TcpStream,
    peer: SocketAddr,
    registry: Arc<Registry>,
    cors: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let data = match read_http_request(&mut stream).await? {
        Incoming::Request(data) => data,
        Incoming::Rejected(response) => {
            warn!(remote_addr = %peer, status = response.status, "request rejected");
            stream.write_all(&response.to_bytes(cors)).await?;
            let _ = stream.shutdown().await;
            return Ok(());
        }
        Incoming::Closed => return Ok(()),
    };
    let req = parse_http_request(&data);

    info!(
        method = %req.method,
        path = %req.path,
        remote_addr = %peer,
        user_agent = req.header("user-agent").unwrap_or(""),
        "incoming request"
    );
    trace!(query = req.query.as_deref().unwrap_or(""), "request query");
    let started = Instant::now();

    let response = respond(&registry, &req, cors);
    stream.write_all(&response.to_bytes(cors)).await?;
    // Peer may already be gone; the response is written either way.
    let _ = stream.shutdown().await;

    info!(
        method = %req.method,
        path = %req.path,
        status = response.status,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "request completed"
    );
    Ok(())
}

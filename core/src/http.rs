//! HTTP transport types and the transport injection seam.
//!
//! # Design
//! Requests and responses are plain data. The client builds `HttpRequest`
//! values; an `HttpTransport` implementation executes them. The default
//! `UreqTransport` does blocking I/O with ureq, and tests substitute a
//! canned transport, so request construction and response interpretation
//! stay deterministic and testable without a network.
//!
//! Transport errors cover connect failures, timeouts and socket I/O only.
//! HTTP status codes are not transport errors here; 4xx/5xx responses come
//! back as data and their interpretation belongs to the client.

use crate::error::TransportError;

/// HTTP method for a request. The DeployBot surface only ever reads
/// resources (GET) or triggers a deployment (POST).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `url` is absolute; `query` pairs are appended to it by the transport.
/// `body` is a JSON document, present only on POST.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Executes one HTTP round-trip. Implementations block until the response
/// is fully read.
pub trait HttpTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default blocking transport over ureq.
///
/// Status-code-as-error is disabled so 4xx/5xx responses are returned as
/// `HttpResponse` data rather than `Err`, leaving status interpretation to
/// the client.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut response = match request.method {
            HttpMethod::Get => {
                let mut call = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name, value);
                }
                for (name, value) in &request.query {
                    call = call.query(name, value);
                }
                call.call()
            }
            HttpMethod::Post => {
                let mut call = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    call = call.header(name, value);
                }
                let body = request.body.unwrap_or_default();
                call.content_type("application/json").send(body.as_bytes())
            }
        }
        .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

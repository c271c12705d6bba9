//! Error types for the DeployBot API client.
//!
//! # Design
//! 4xx responses get the dedicated `Api` variant because they carry the
//! server's raw, undecoded body — DeployBot reports request-side problems
//! as plain text, not JSON. 5xx and transport failures are separate
//! variants so callers can tell "the request was wrong" from "the service
//! or the network misbehaved."

use thiserror::Error;

/// Failure inside an [`HttpTransport`](crate::http::HttpTransport)
/// implementation: connect failure, timeout, socket I/O.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors returned by [`DeployBot`](crate::DeployBot) operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request (4xx). `body` is the raw response
    /// text, verbatim. The client's pending query is left intact on this
    /// path so the caller can inspect or resend it.
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    /// The server failed (5xx). Passed through unmodified.
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },

    /// The HTTP round-trip itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A success response carried a body that is not valid JSON.
    #[error("invalid JSON in response body: {0}")]
    Decode(#[from] serde_json::Error),
}

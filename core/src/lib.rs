//! Synchronous client for the DeployBot deployment-automation REST API.
//!
//! # Overview
//! Authenticates with an `X-Api-Token` header, accumulates query
//! parameters through chained setter calls, and issues GET/POST requests
//! to per-resource endpoints, returning the decoded JSON response.
//!
//! # Design
//! - `DeployBot` owns the pending query map and a boxed [`HttpTransport`];
//!   the default transport is blocking ureq, and tests inject their own.
//! - The original clients' dynamic method dispatch (`getUsers()`,
//!   `.limit(2)`) is an explicit [`dispatch::Intent`] parser plus typed
//!   `param` / `fetch` / `trigger_deployment` operations.
//! - Responses are dynamic `serde_json::Value`s; the API surface is
//!   open-ended, so no resource schema is baked in.
//! - 4xx responses become [`ApiError::Api`] carrying the raw body verbatim
//!   and leave the pending query intact; 5xx, transport and decode
//!   failures propagate unmodified.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod http;

pub use client::DeployBot;
pub use dispatch::{snake_case, Intent};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, UreqTransport};

//! Synchronous client for the DeployBot REST API.
//!
//! # Design
//! `DeployBot` holds the API token, the account-derived endpoint and a
//! pending query map. Parameter setters accumulate into the map and chain;
//! a resource fetch or the deployment trigger turns the map into one HTTP
//! request (query string for GET, JSON body for POST), executes it through
//! the injected [`HttpTransport`], and decodes the JSON response. The map
//! is cleared only after a success response is accepted, so a failed
//! request leaves the accumulated parameters in place.
//!
//! One instance, one caller: the pending map is unsynchronized mutable
//! state. Concurrent use needs independent instances.

use std::collections::BTreeMap;

use log::debug;
use serde_json::Value;

use crate::dispatch::{snake_case, Intent};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpTransport, UreqTransport};

/// URL template the account name is substituted into.
const ENDPOINT_TEMPLATE: &str = "https://{account}.deploybot.com/api/v1/";

/// Client for one DeployBot account.
pub struct DeployBot {
    api_key: String,
    endpoint: String,
    query: BTreeMap<String, Value>,
    transport: Box<dyn HttpTransport>,
}

impl DeployBot {
    /// Build a client for `account` using the default ureq transport.
    /// No network I/O happens until the first fetch or trigger call.
    pub fn new(api_key: &str, account: &str) -> Self {
        Self::with_transport(api_key, account, Box::new(UreqTransport::new()))
    }

    /// Build a client with an injected transport.
    pub fn with_transport(api_key: &str, account: &str, transport: Box<dyn HttpTransport>) -> Self {
        Self::from_endpoint(api_key, &parse_endpoint(account), transport)
    }

    /// Build a client against an explicit endpoint URL instead of the
    /// account-derived one. Used to point at a local server in tests.
    pub fn from_endpoint(api_key: &str, endpoint: &str, transport: Box<dyn HttpTransport>) -> Self {
        Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.to_string(),
            query: BTreeMap::new(),
            transport,
        }
    }

    /// The resolved base URL, e.g. `https://foobar.deploybot.com/api/v1/`.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The accumulated, not-yet-sent query parameters.
    pub fn pending_query(&self) -> &BTreeMap<String, Value> {
        &self.query
    }

    /// Store a query parameter for the next request. `name` is converted
    /// to snake_case; a second set under the same derived key overwrites
    /// the first. Chains.
    pub fn param(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.query.insert(snake_case(name), value.into());
        self
    }

    /// GET a resource, e.g. `fetch("users", None)` or
    /// `fetch("deployments", Some(5))` for `deployments/5`. Pending query
    /// parameters go into the URL query string and are cleared on success.
    pub fn fetch(&mut self, resource: &str, id: Option<i64>) -> Result<Value, ApiError> {
        let path = match id {
            Some(id) => format!("{resource}/{id}"),
            None => resource.to_string(),
        };
        self.send(HttpMethod::Get, &path)
    }

    /// Trigger a deployment run: POST to `deployments` with the pending
    /// query parameters JSON-encoded as the request body.
    pub fn trigger_deployment(&mut self) -> Result<Value, ApiError> {
        self.send(HttpMethod::Post, "deployments")
    }

    /// Execute a method-style call by name, following the original calling
    /// convention: `get<Name>` fetches the resource `<name>` (a single
    /// integer argument becomes a path suffix) and returns the response;
    /// any other name stores its first argument as a query parameter and
    /// returns `None`.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Option<Value>, ApiError> {
        match Intent::parse(name) {
            Intent::Fetch { resource } => {
                let id = match args {
                    [Value::Number(n)] => n.as_i64(),
                    _ => None,
                };
                self.fetch(&resource, id).map(Some)
            }
            Intent::SetParam { name } => {
                if let Some(value) = args.first() {
                    self.query.insert(name, value.clone());
                }
                Ok(None)
            }
        }
    }

    fn send(&mut self, method: HttpMethod, path: &str) -> Result<Value, ApiError> {
        let request = HttpRequest {
            method,
            url: format!("{}{path}", self.endpoint),
            query: match method {
                HttpMethod::Get => query_pairs(&self.query),
                HttpMethod::Post => Vec::new(),
            },
            headers: vec![
                ("X-Api-Token".to_string(), self.api_key.clone()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
            body: match method {
                HttpMethod::Get => None,
                HttpMethod::Post => Some(serde_json::to_string(&self.query)?),
            },
        };

        debug!(
            "{method:?} {} ({} pending params)",
            request.url,
            self.query.len()
        );
        let response = self.transport.execute(request)?;

        match response.status {
            400..=499 => Err(ApiError::Api {
                status: response.status,
                body: response.body,
            }),
            500..=599 => Err(ApiError::Server {
                status: response.status,
                body: response.body,
            }),
            _ => {
                // Parameters are consumed by the request that sent them.
                self.query.clear();
                Ok(serde_json::from_str(&response.body)?)
            }
        }
    }
}

/// Substitute the account name into the endpoint template.
fn parse_endpoint(account: &str) -> String {
    ENDPOINT_TEMPLATE.replace("{account}", account)
}

/// Render pending parameters as query-string pairs. Strings go verbatim;
/// everything else uses its JSON rendering.
fn query_pairs(query: &BTreeMap<String, Value>) -> Vec<(String, String)> {
    query
        .iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), rendered)
        })
        .collect()
}

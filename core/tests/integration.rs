//! End-to-end test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through the default ureq transport: resource
//! fetches, id path suffixes, query accumulation, the deployment trigger
//! and the 4xx raw-body path.

use deploybot_core::{ApiError, DeployBot, UreqTransport};
use serde_json::json;

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: std::net::SocketAddr, token: &str) -> DeployBot {
    DeployBot::from_endpoint(
        token,
        &format!("http://{addr}/api/v1/"),
        Box::new(UreqTransport::new()),
    )
}

#[test]
fn api_lifecycle() {
    let addr = start_server();
    let mut db = client_for(addr, mock_server::API_TOKEN);

    // Fetch the user list through the method-name convention.
    let users = db.call("getUsers", &[]).unwrap().unwrap();
    assert_eq!(users["entries"].as_array().unwrap().len(), 3);

    // Fetch a single user by id path suffix.
    let user = db.call("getUsers", &[json!(1)]).unwrap().unwrap();
    assert_eq!(user["email"], "ada@example.com");

    // Accumulate a query parameter, then list deployments with it.
    let deployments = db.param("limit", 1).fetch("deployments", None).unwrap();
    assert_eq!(deployments["entries"].as_array().unwrap().len(), 1);
    assert!(db.pending_query().is_empty());

    // The limit must not leak into the next request.
    let deployments = db.fetch("deployments", None).unwrap();
    assert_eq!(deployments["entries"].as_array().unwrap().len(), 2);

    // Trigger a deployment with a JSON body built from pending params.
    db.param("environmentId", 42).param("deployedVersion", "abc123");
    let created = db.trigger_deployment().unwrap();
    assert_eq!(created["state"], "pending");
    assert_eq!(created["environment_id"], 42);
    assert_eq!(created["deployed_version"], "abc123");
    assert!(db.pending_query().is_empty());

    // The new deployment is fetchable by its id.
    let id = created["id"].as_i64().unwrap();
    let fetched = db.fetch("deployments", Some(id)).unwrap();
    assert_eq!(fetched["id"], id);

    // Unknown id: 404 comes back as a structured error with the raw body.
    let err = db.param("limit", 3).fetch("deployments", Some(9999)).unwrap_err();
    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "Deployment not found");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
    // The failed request did not consume the pending parameter.
    assert_eq!(db.pending_query().get("limit"), Some(&json!(3)));
}

#[test]
fn bad_token_is_a_client_error() {
    let addr = start_server();
    let mut db = client_for(addr, "wrong-token");

    let err = db.fetch("users", None).unwrap_err();
    match err {
        ApiError::Api { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Invalid API token");
        }
        other => panic!("expected ApiError::Api, got {other:?}"),
    }
}

//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: client options → HTTP requests → decoded data

use asana_client::{
    load_config_from_str, AuthConfig, Client, Collection, Error, ErrorKind, Options, Retries,
};
use futures::TryStreamExt;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_url(server.uri())
        .retry_delay(Duration::from_millis(10))
        .build()
        .unwrap()
}

// ============================================================================
// Verbs
// ============================================================================

#[tokio::test]
async fn test_get_returns_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("Authorization", "Bearer 0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"gid": "1", "name": "Alice"}
        })))
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .auth(AuthConfig::bearer("0/token"))
        .build()
        .unwrap();
    let me = client
        .get("/users/me", &Options::new(), &Options::new())
        .await
        .unwrap();

    assert_eq!(me, json!({"gid": "1", "name": "Alice"}));
}

#[tokio::test]
async fn test_basic_auth_uses_api_key_as_username() {
    let mock_server = MockServer::start().await;

    // base64("key123:")
    Mock::given(header("Authorization", "Basic a2V5MTIzOg=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .auth(AuthConfig::api_key("key123"))
        .build()
        .unwrap();
    client
        .get("/workspaces", &Options::new(), &Options::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_serializes_query_modifiers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("limit", "10"))
        .and(query_param("opt_fields", "name,notes"))
        .and(query_param("opt_pretty", "true"))
        .and(query_param("completed_since", "now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = Options::new()
        .with("limit", 10)
        .with("fields", json!(["name", "notes"]))
        .with("pretty", true);
    let data = client
        .get(
            "/tasks",
            &Options::new().with("completed_since", "now"),
            &options,
        )
        .await
        .unwrap();

    assert_eq!(data, json!([]));
}

#[tokio::test]
async fn test_post_and_put_wrap_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "data": {"name": "Ship it"},
            "options": {"fields": ["name"]}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"gid": "5", "name": "Ship it"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/tasks/5"))
        .and(body_json(json!({"data": {"completed": true}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"gid": "5", "completed": true}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created = client
        .post(
            "/tasks",
            json!({"name": "Ship it"}),
            &Options::new().with("fields", json!(["name"])),
        )
        .await
        .unwrap();
    assert_eq!(created["gid"], "5");

    let updated = client
        .put("/tasks/5", json!({"completed": true}), &Options::new())
        .await
        .unwrap();
    assert_eq!(updated["completed"], true);
}

#[tokio::test]
async fn test_delete_sends_no_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/tags/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.delete("/tags/3", &Options::new()).await.unwrap();
    assert_eq!(result, json!({}));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test]
async fn test_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First request fails, second succeeds
    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"gid": "p"}]})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let data = client
        .get("/projects", &Options::new(), &Options::new())
        .await
        .unwrap();

    assert_eq!(data, json!([{"gid": "p"}]));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_rate_limit_honors_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0.2"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "ok"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let start = Instant::now();
    let data = client
        .get("/workspaces", &Options::new(), &Options::new())
        .await
        .unwrap();

    assert_eq!(data, json!("ok"));
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_retries_exhausted_returns_last_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_url(mock_server.uri())
        .retries(Retries::Bounded(2))
        .retry_delay(Duration::from_millis(5))
        .build()
        .unwrap();

    let err = client
        .get("/tasks", &Options::new(), &Options::new())
        .await
        .unwrap_err();
    let api = err.api().unwrap();
    assert_eq!(api.kind, ErrorKind::ServerError);
    assert_eq!(api.status, 503);
    assert_eq!(api.body, "unavailable");
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"message": "task: Unknown object: 1"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get("/tasks/1", &Options::new(), &Options::new())
        .await
        .unwrap_err();

    assert!(matches!(&err, Error::Api(api) if api.kind == ErrorKind::NotFound));
    assert!(err.to_string().contains("Unknown object"));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_items_across_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("project", "42"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"gid": "1"}, {"gid": "2"}],
            "next_page": {"offset": "abc", "path": "/tasks?project=42&offset=abc"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("offset", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"gid": "3"}],
            "next_page": null
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let items: Vec<Value> = client
        .get_items(
            "/tasks",
            &Options::new().with("project", "42"),
            &Options::new(),
        )
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(items, vec![json!({"gid": "1"}), json!({"gid": "2"}), json!({"gid": "3"})]);
}

#[tokio::test]
async fn test_collection_without_iterator() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"gid": "t"}],
            "next_page": {"offset": "x", "path": "/tags?offset=x"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let collection = client
        .get_collection(
            "/tags",
            &Options::new(),
            &Options::new().with("iterator_type", Value::Null),
        )
        .await
        .unwrap();

    let Collection::Data(data) = collection else {
        panic!("Expected Data");
    };
    assert_eq!(data, json!([{"gid": "t"}]));
}

// ============================================================================
// Config File
// ============================================================================

#[tokio::test]
async fn test_client_from_config_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workspaces"))
        .and(header("Authorization", "Bearer from-config"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let yaml = format!(
        "options:\n  base_url: {}\n  limit: 25\nauth:\n  type: bearer\n  token: from-config\n",
        mock_server.uri()
    );
    let client = load_config_from_str(&yaml).unwrap().build().unwrap();

    client
        .get("/workspaces", &Options::new(), &Options::new())
        .await
        .unwrap();
}

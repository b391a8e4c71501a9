//! Integration tests for the environment client.

use chrono::{Duration, Utc};
use faculty_core::{
    AccessToken, AccessTokenCache, BaseClient, ClientError, EnvironmentClient,
    HttpTokenIssuer, MemoryAccessTokenCache, Profile, Session,
};
use std::sync::Arc;
use uuid::Uuid;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const PROJECT_ID: &str = "5b1d2c3e-4f5a-4b6c-8d7e-9f0a1b2c3d4e";

/// Helper to build a session whose cache already holds a valid token.
fn session_with_token(token: &str) -> Arc<Session> {
    let profile = Profile::new("test.domain.com", "https", "id", "secret");
    let cache = Arc::new(MemoryAccessTokenCache::new());
    cache.add(
        &profile,
        AccessToken::new(token, Utc::now() + Duration::minutes(10)),
    );
    Arc::new(Session::new(
        profile,
        cache,
        Arc::new(HttpTokenIssuer::new().with_endpoint("http://127.0.0.1:9/access_token")),
    ))
}

fn client_for(server: &MockServer, session: Arc<Session>) -> EnvironmentClient {
    let base = BaseClient::new(session, EnvironmentClient::SERVICE_NAME)
        .unwrap()
        .with_base_url(&server.uri())
        .unwrap();
    EnvironmentClient::from_base(base)
}

#[tokio::test]
async fn test_list_environments() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/project/{}/environment", PROJECT_ID)))
        .and(header("authorization", "Bearer access-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "environmentId": "8d7a9b2e-0c7c-4a4f-9b7e-1c2d3e4f5a6b",
                "projectId": PROJECT_ID,
                "name": "python-deps",
                "description": "Installs project requirements",
                "authorId": "0f1e2d3c-4b5a-4c6d-8e7f-a0b1c2d3e4f5",
                "createdAt": "2019-03-01T12:00:00Z",
                "updatedAt": "2019-03-02T08:30:00Z"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("access-token"));
    let environments = client.list(Uuid::parse_str(PROJECT_ID).unwrap()).await.unwrap();

    assert_eq!(environments.len(), 1);
    assert_eq!(environments[0].name, "python-deps");
    assert_eq!(environments[0].project_id.to_string(), PROJECT_ID);
}

#[tokio::test]
async fn test_list_environments_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("access-token"));
    let environments = client.list(Uuid::new_v4()).await.unwrap();

    assert!(environments.is_empty());
}

#[tokio::test]
async fn test_list_environments_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("project not found"))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("access-token"));
    let result = client.list(Uuid::new_v4()).await;

    assert!(matches!(result, Err(ClientError::Http { status: 404, .. })));
}

#[tokio::test]
async fn test_list_environments_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "unexpected": true
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, session_with_token("access-token"));
    let result = client.list(Uuid::new_v4()).await;

    assert!(matches!(result, Err(ClientError::Decode { .. })));
}

#[tokio::test]
async fn test_list_environments_without_token_fails_auth() {
    let server = MockServer::start().await;
    let profile = Profile::new("test.domain.com", "https", "id", "secret");
    let session = Arc::new(Session::new(
        profile,
        Arc::new(MemoryAccessTokenCache::new()),
        Arc::new(HttpTokenIssuer::new().with_endpoint("http://127.0.0.1:9/access_token")),
    ));

    let client = client_for(&server, session);
    let result = client.list(Uuid::new_v4()).await;

    assert!(matches!(result, Err(ClientError::Auth(_))));
}

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use graphling::{Error, GraphClient, SessionState, TokenRecord};

const QUERY: &str = "query { viewer { id } }";

fn write_keyfile(dir: &Path, server_uri: &str) -> PathBuf {
    let keyfile = dir.join("api-key.json");
    let contents = json!({
        "client_id": "cid",
        "client_secret": "shhh",
        "name": "svc",
        "access_token_uri": format!("{server_uri}/token"),
    });
    fs::write(&keyfile, contents.to_string()).expect("write keyfile");
    keyfile
}

fn write_token_file(keyfile: &Path, access_token: &str, expires_in_secs: i64) -> PathBuf {
    let token_path = keyfile.with_extension("token");
    let record = TokenRecord {
        access_token: access_token.to_string(),
        expires_at: Utc::now() + chrono::Duration::seconds(expires_in_secs),
    };
    fs::write(&token_path, serde_json::to_string(&record).expect("encode")).expect("write token");
    token_path
}

fn read_token_file(keyfile: &Path) -> TokenRecord {
    let contents = fs::read_to_string(keyfile.with_extension("token")).expect("read token file");
    serde_json::from_str(&contents).expect("decode token file")
}

async fn mount_token_endpoint(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_graphql_endpoint(server: &MockServer, bearer: &str) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", format!("Bearer {bearer}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_query_triggers_exactly_one_fetch() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    mount_token_endpoint(&server, "tok-1", 1).await;
    mount_graphql_endpoint(&server, "tok-1").await;

    let client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    assert_eq!(client.session_state(), Some(SessionState::Valid));
    client.query(QUERY, None).await.expect("query should succeed");

    let record = read_token_file(&keyfile);
    assert_eq!(record.access_token, "tok-1");
}

#[tokio::test]
async fn fresh_persisted_token_skips_fetch() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());
    write_token_file(&keyfile, "tok-cached", 1800);

    mount_token_endpoint(&server, "tok-unexpected", 0).await;
    mount_graphql_endpoint(&server, "tok-cached").await;

    let client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    assert_eq!(client.session_state(), Some(SessionState::Valid));
    client.query(QUERY, None).await.expect("query should succeed");
}

#[tokio::test]
async fn expired_persisted_token_is_refetched_and_overwritten() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());
    write_token_file(&keyfile, "tok-old", -7200);

    mount_token_endpoint(&server, "tok-fresh", 1).await;

    let client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    assert_eq!(client.session_state(), Some(SessionState::Valid));
    let record = read_token_file(&keyfile);
    assert_eq!(record.access_token, "tok-fresh");
    assert!(record.expires_at > Utc::now() + chrono::Duration::minutes(55));
}

#[tokio::test]
async fn renew_token_always_fetches() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    // One fetch at connect, one more for the forced renewal.
    mount_token_endpoint(&server, "tok-1", 2).await;

    let mut client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    client.renew_token().await.expect("renewal should succeed");
    assert_eq!(client.session_state(), Some(SessionState::Valid));
}

#[tokio::test]
async fn keep_token_false_writes_no_file_and_close_hits_delete_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    mount_token_endpoint(&server, "tok-1", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/session"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .with_keep_token(false)
        .connect()
        .await
        .expect("client");

    assert!(!keyfile.with_extension("token").exists());

    client.close_session().await.expect("close should succeed");
    assert_eq!(client.session_state(), Some(SessionState::NoToken));
    assert!(!keyfile.with_extension("token").exists());
}

#[tokio::test]
async fn close_session_invalidates_and_clears_the_store() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    mount_token_endpoint(&server, "tok-1", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    assert!(keyfile.with_extension("token").exists());
    client.close_session().await.expect("close should succeed");
    assert!(!keyfile.with_extension("token").exists());
}

#[tokio::test]
async fn close_session_failure_still_clears_local_state() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    mount_token_endpoint(&server, "tok-1", 1).await;
    Mock::given(method("DELETE"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_string("session backend down"))
        .mount(&server)
        .await;

    let mut client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    let err = client.close_session().await.expect_err("close should fail");
    assert!(matches!(err, Error::Request { .. }));
    assert_eq!(client.session_state(), Some(SessionState::NoToken));
    assert!(!keyfile.with_extension("token").exists());
}

#[tokio::test]
async fn manage_token_false_uses_persisted_token_as_is() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    // Stale on purpose: with management disabled staleness is the caller's
    // responsibility.
    write_token_file(&keyfile, "tok-stale", -7200);

    mount_token_endpoint(&server, "tok-unexpected", 0).await;
    mount_graphql_endpoint(&server, "tok-stale").await;

    let client = GraphClient::builder()
        .with_keyfile(&keyfile)
        .with_manage_token(false)
        .connect()
        .await
        .expect("client");

    assert_eq!(client.session_state(), Some(SessionState::Disabled));
    client.query(QUERY, None).await.expect("query should succeed");
}

#[tokio::test]
async fn token_exchange_401_is_authentication_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .expect(1)
        .mount(&server)
        .await;

    let err = GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect_err("connect should fail");

    match err {
        Error::Authentication { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(body, "bad credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_reported_lifetime_overrides_default_ttl() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let keyfile = write_keyfile(dir.path(), &server.uri());

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-short",
            "token_type": "Bearer",
            "expires_in": 120,
        })))
        .expect(1)
        .mount(&server)
        .await;

    GraphClient::builder()
        .with_keyfile(&keyfile)
        .connect()
        .await
        .expect("client");

    let record = read_token_file(&keyfile);
    assert!(record.expires_at <= Utc::now() + chrono::Duration::minutes(3));
}

#[tokio::test]
async fn renew_and_close_are_config_errors_in_anonymous_mode() {
    let server = MockServer::start().await;

    let mut client = GraphClient::builder()
        .with_base_url(server.uri())
        .connect()
        .await
        .expect("client");

    assert!(matches!(
        client.renew_token().await.unwrap_err(),
        Error::Config(_)
    ));
    assert!(matches!(
        client.close_session().await.unwrap_err(),
        Error::Config(_)
    ));
}

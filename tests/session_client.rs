// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session client against a mock server
//!
//! The client blocks, so every exchange runs on tokio's blocking pool while
//! the mock server keeps serving on the runtime.

use std::path::PathBuf;

use garmin_session::http::headers::{COOKIE, SET_COOKIE};
use garmin_session::{PostRequest, SessionClient, SessionConfig, NO_STATUS};
use tempfile::TempDir;
use wiremock::matchers::{body_string, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

fn cookie_dir() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    (dir, path)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_get_updates_status_but_not_info() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activities"))
        .and(query_param("start", "0"))
        .and(query_param("limit", "20"))
        .and(header("nk", "NT"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (initial, body, status, info) = blocking(move || {
        let mut client =
            SessionClient::with_config("user123", SessionConfig::default().cookie_dir(dir))
                .unwrap();
        let initial = client.last_status_code();

        client.post(&format!("{}/login", uri), PostRequest::new());
        let body = client.get(
            &format!("{}/activities", uri),
            &[("start", "0"), ("limit", "20")],
            true,
        );

        (
            initial,
            body,
            client.last_status_code(),
            client.last_request_info().cloned(),
        )
    })
    .await;

    assert_eq!(initial, NO_STATUS);
    assert_eq!(&body[..], b"[]");
    assert_eq!(status, 200);

    let info = info.expect("POST records request info");
    assert_eq!(info.http_code, 201);
    assert_eq!(info.method, "POST");
    assert!(info.url.ends_with("/login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_record_get_info_captures_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":1}"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let info = blocking(move || {
        let config = SessionConfig::default().cookie_dir(dir).record_get_info(true);
        let mut client = SessionClient::with_config("user123", config).unwrap();
        client.get(&format!("{}/profile", uri), &[], true);
        client.last_request_info().cloned()
    })
    .await
    .expect("GET info recorded");

    assert_eq!(info.method, "GET");
    assert_eq!(info.http_code, 200);
    assert_eq!(info.size_download, 8);
    assert_eq!(info.size_upload, 0);
    assert_eq!(info.primary_ip.as_deref(), Some("127.0.0.1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_form_wins_over_raw_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_string("b=2"))
        .and(header("content-length", "3"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (status, info) = blocking(move || {
        let mut client =
            SessionClient::with_config("user123", SessionConfig::default().cookie_dir(dir))
                .unwrap();
        client.post(
            &format!("{}/upload", uri),
            PostRequest::new().raw_payload("a=1").form_field("b", "2"),
        );
        (client.last_status_code(), client.last_request_info().cloned())
    })
    .await;

    assert_eq!(status, 200);
    assert_eq!(info.unwrap().size_upload, 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_defaults_to_form_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signin"))
        .and(query_param("service", "https://connect.garmin.com/modern"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("referer", "https://sso.garmin.com/sso/signin"))
        .and(body_string("username=runner%40example.com&password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ticket"))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (body, status) = blocking(move || {
        let mut client =
            SessionClient::with_config("user123", SessionConfig::default().cookie_dir(dir))
                .unwrap();
        let body = client.post(
            &format!("{}/signin", uri),
            PostRequest::new()
                .param("service", "https://connect.garmin.com/modern")
                .form_field("username", "runner@example.com")
                .form_field("password", "secret")
                .referer("https://sso.garmin.com/sso/signin"),
        );
        (body, client.last_status_code())
    })
    .await;

    assert_eq!(status, 200);
    assert_eq!(&body[..], b"ticket");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_marker_on_post_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/json"))
        .and(header("nk", "NT"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let status = blocking(move || {
        let config = SessionConfig::default().cookie_dir(dir).marker_on_post(true);
        let mut client = SessionClient::with_config("user123", config).unwrap();
        client.post(
            &format!("{}/json", uri),
            PostRequest::new()
                .header("Content-Type", "application/json")
                .raw_payload("{}"),
        );
        client.last_status_code()
    })
    .await;

    assert_eq!(status, 204);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_is_overridden_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/activity/42"))
        .and(header("x-http-method-override", "DELETE"))
        .and(header("nk", "NT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (status, info) = blocking(move || {
        let mut client =
            SessionClient::with_config("user123", SessionConfig::default().cookie_dir(dir))
                .unwrap();
        client.delete(&format!("{}/activity/42", uri));
        (client.last_status_code(), client.last_request_info().cloned())
    })
    .await;

    assert_eq!(status, 204);
    let info = info.unwrap();
    assert_eq!(info.method, "POST");
    assert_eq!(info.http_code, 204);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirects_follow_flag() {
    let server = MockServer::start().await;
    let location = format!("{}/final", server.uri());
    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", location.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/final"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (stopped, followed, info) = blocking(move || {
        let config = SessionConfig::default().cookie_dir(dir).record_get_info(true);
        let mut client = SessionClient::with_config("user123", config).unwrap();

        client.get(&format!("{}/start", uri), &[], false);
        let stopped = client.last_status_code();

        client.get(&format!("{}/start", uri), &[], true);
        (
            stopped,
            client.last_status_code(),
            client.last_request_info().cloned(),
        )
    })
    .await;

    assert_eq!(stopped, 302);
    assert_eq!(followed, 200);
    let info = info.unwrap();
    assert_eq!(info.redirect_count, 1);
    assert!(info.redirected());
    assert!(info.url.ends_with("/final"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cookie_survives_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header(SET_COOKIE, "SESSIONID=abc; Path=/"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header(COOKIE, "SESSIONID=abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (status, file_written) = blocking(move || {
        let mut client =
            SessionClient::with_config("user123", SessionConfig::default().cookie_dir(dir))
                .unwrap();
        client.get(&format!("{}/login", uri), &[], true);
        let file_written = client.cookie_path().exists();

        client.refresh_session().unwrap();
        client.get(&format!("{}/me", uri), &[], true);
        (client.last_status_code(), file_written)
    })
    .await;

    assert!(file_written);
    assert_eq!(status, 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cookie_shared_by_identifier() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header(SET_COOKIE, "CASTGC=tgt; Path=/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header_exists(COOKIE))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let status = blocking(move || {
        let config = SessionConfig::default().cookie_dir(dir);
        let mut first = SessionClient::with_config("runner", config.clone()).unwrap();
        first.get(&format!("{}/login", uri), &[], true);
        drop(first);

        let mut second = SessionClient::with_config("runner", config).unwrap();
        second.get(&format!("{}/me", uri), &[], true);
        second.last_status_code()
    })
    .await;

    assert_eq!(status, 200);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cleanup_removes_cookie_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).insert_header(SET_COOKIE, "SESSIONID=abc; Path=/"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (before, after) = blocking(move || {
        let mut client =
            SessionClient::with_config("user123", SessionConfig::default().cookie_dir(dir))
                .unwrap();
        client.get(&format!("{}/login", uri), &[], true);

        let path = client.cookie_path().to_path_buf();
        let before = path.exists();
        client.cleanup_session().unwrap();
        (before, path.exists())
    })
    .await;

    assert!(before);
    assert!(!after);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_failure_resets_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (_dir, dir) = cookie_dir();
    let (body, status, network, info_kept) = blocking(move || {
        let config = SessionConfig::default().cookie_dir(dir).record_get_info(true);
        let mut client = SessionClient::with_config("user123", config).unwrap();
        client.get(&format!("{}/ok", uri), &[], true);

        // nothing listens on port 1
        let body = client.delete("http://127.0.0.1:1/activity/42");
        let network = client.last_error().map(|e| e.is_network()).unwrap_or(false);
        let info_kept = client
            .last_request_info()
            .map(|info| info.url.ends_with("/ok"))
            .unwrap_or(false);
        (body, client.last_status_code(), network, info_kept)
    })
    .await;

    assert!(body.is_empty());
    assert_eq!(status, 0);
    assert!(network);
    assert!(info_kept);
}

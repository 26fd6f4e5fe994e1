//! Unit tests for the snippet source
//!
//! Tests cover:
//! - Fetch success returns every snippet in order
//! - HTTP errors, malformed bodies and unreachable hosts leave the list empty

use nevera::errors::FetchError;
use nevera::server::SnippetServer;
use nevera::snippets::{load_snippets, HttpSnippetSource, SnippetSource};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One-shot server answering any request with `body` and status 200
async fn raw_server(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
        }
    });
    format!("http://{}/api/functions", addr)
}

fn source(url: &str) -> HttpSnippetSource {
    HttpSnippetSource::new(url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_returns_all_snippets() {
    let snippets: Vec<String> = (0..5).map(|i| format!("fn f{}() {{}}", i)).collect();
    let server = SnippetServer::bind("127.0.0.1:0", snippets.clone())
        .await
        .unwrap();

    let fetched = load_snippets(&source(&server.snippets_url())).await;
    assert_eq!(fetched.len(), 5);
    assert_eq!(fetched, snippets);

    server.stop().await;
}

#[tokio::test]
async fn test_fetch_empty_array() {
    let server = SnippetServer::bind("127.0.0.1:0", Vec::new()).await.unwrap();
    let fetched = load_snippets(&source(&server.snippets_url())).await;
    assert!(fetched.is_empty());
    server.stop().await;
}

#[tokio::test]
async fn test_not_found_is_http_status_error() {
    let server = SnippetServer::bind("127.0.0.1:0", vec!["x".into()])
        .await
        .unwrap();
    let src = source(&format!("{}/api/missing", server.url()));

    match src.fetch().await {
        Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {:?}", other),
    }
    assert!(load_snippets(&src).await.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn test_object_body_is_parse_error() {
    let url = raw_server(r#"{"functions": ["a"]}"#).await;
    let result = source(&url).fetch().await;
    assert!(matches!(result, Err(FetchError::Parse(_))), "{:?}", result);
}

#[tokio::test]
async fn test_mixed_array_leaves_list_empty() {
    let url = raw_server(r#"["a", 1, null]"#).await;
    assert!(load_snippets(&source(&url)).await.is_empty());
}

#[tokio::test]
async fn test_unreachable_host_leaves_list_empty() {
    // Bind then drop to get a port with nothing listening
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let src = source(&format!("http://127.0.0.1:{}/api/functions", port));
    assert!(src.fetch().await.is_err());
    assert!(load_snippets(&src).await.is_empty());
}

//! Unit tests for the development snippet server over real sockets

use nevera::server::SnippetServer;

#[tokio::test]
async fn test_serves_json_array_with_cors() {
    let server = SnippetServer::bind("127.0.0.1:0", vec!["a=1".into(), "b=\"2\"".into()])
        .await
        .unwrap();

    let resp = reqwest::get(server.snippets_url()).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let body: Vec<String> = resp.json().await.unwrap();
    assert_eq!(body, vec!["a=1".to_string(), "b=\"2\"".to_string()]);

    server.stop().await;
}

#[tokio::test]
async fn test_unprefixed_path() {
    let server = SnippetServer::bind("127.0.0.1:0", vec!["x".into()])
        .await
        .unwrap();
    let resp = reqwest::get(format!("{}/functions", server.url()))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    server.stop().await;
}

#[tokio::test]
async fn test_post_not_allowed() {
    let server = SnippetServer::bind("127.0.0.1:0", vec!["x".into()])
        .await
        .unwrap();
    let resp = reqwest::Client::new()
        .post(server.snippets_url())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 405);
    server.stop().await;
}

#[tokio::test]
async fn test_port_in_use() {
    let first = SnippetServer::bind("127.0.0.1:0", Vec::new()).await.unwrap();
    let addr = first.local_addr().to_string();
    let second = SnippetServer::bind(&addr, Vec::new()).await;
    assert!(second.is_err());
    first.stop().await;
}

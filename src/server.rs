//! Development snippet server
//!
//! Serves the configured snippet list as a JSON array of strings at
//! `GET /api/functions`, and at `GET /functions` for setups where a proxy
//! strips the `/api` prefix. Anything else gets 404 (or 405 for a known path
//! with the wrong method). Responses carry a permissive CORS header.
//!
//! ```ignore
//! let server = SnippetServer::bind("127.0.0.1:0", snippets).await?;
//! let url = server.snippets_url(); // "http://127.0.0.1:PORT/api/functions"
//! server.stop().await;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::errors::NeveraError;

pub const SNIPPETS_PATH: &str = "/api/functions";
const SNIPPETS_PATH_UNPREFIXED: &str = "/functions";

/// A status line and JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// Decide the reply for a request line. `snippets_json` is the pre-encoded list.
pub fn route(method: &str, target: &str, snippets_json: &str) -> Reply {
    let path = target.split(['?', '#']).next().unwrap_or("");
    let known = path == SNIPPETS_PATH || path == SNIPPETS_PATH_UNPREFIXED;

    match (known, method) {
        (true, "GET") => Reply {
            status: 200,
            body: snippets_json.to_string(),
        },
        (true, _) => Reply {
            status: 405,
            body: r#"{"error":"method not allowed"}"#.to_string(),
        },
        (false, _) => Reply {
            status: 404,
            body: r#"{"error":"not found"}"#.to_string(),
        },
    }
}

pub struct SnippetServer {
    addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    handle: tokio::task::JoinHandle<()>,
}

impl SnippetServer {
    /// Bind and start serving in a background task. Port 0 picks a free port.
    pub async fn bind(addr: &str, snippets: Vec<String>) -> Result<Self, NeveraError> {
        let server_err = |message: String| NeveraError::Server {
            addr: addr.to_string(),
            message,
        };

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| server_err(e.to_string()))?;
        let local = listener
            .local_addr()
            .map_err(|e| server_err(e.to_string()))?;
        let body = serde_json::to_string(&snippets)
            .map_err(|e| server_err(format!("failed to encode snippets: {}", e)))?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(accept_loop(listener, Arc::new(body), shutdown_rx));

        info!(count = snippets.len(), "Serving snippets on http://{}", local);
        Ok(Self {
            addr: local,
            shutdown_tx,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL, e.g. `http://127.0.0.1:5000`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL of the snippet endpoint
    pub fn snippets_url(&self) -> String {
        format!("{}{}", self.url(), SNIPPETS_PATH)
    }

    /// Stop accepting connections and wait for the accept loop to end.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
    }
}

async fn accept_loop(
    listener: TcpListener,
    body: Arc<String>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => {
                        let body = Arc::clone(&body);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, &body).await {
                                debug!("connection from {} failed: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => debug!("accept error: {}", e),
                }
            }
        }
    }
}

/// Read one request, answer it, close the connection.
async fn handle_connection(mut stream: TcpStream, snippets_json: &str) -> std::io::Result<()> {
    let mut buf = vec![0u8; 8192];
    let n = stream.read(&mut buf).await?;
    if n == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buf[..n]);
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");

    let reply = route(method, target, snippets_json);
    debug!("{} {} -> {}", method, target, reply.status);
    write_http_response(&mut stream, &reply).await
}

async fn write_http_response(stream: &mut TcpStream, reply: &Reply) -> std::io::Result<()> {
    let status_text = match reply.status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Error",
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nAccess-Control-Allow-Origin: *\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        status_text,
        reply.body.len(),
        reply.body,
    );

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

//! Local HTTP server that answers every request with one fixed response.
//!
//! Adapters are pointed at it through their `base_url` override.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Response served for every request.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl CannedResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// 200 with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self::new(200)
            .with_header("Content-Type", "application/json")
            .with_body(body)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} Canned\r\n", self.status);
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!(
            "Content-Length: {}\r\nConnection: close\r\n\r\n",
            self.body.len()
        ));

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}

/// Server bound to an ephemeral port on 127.0.0.1. Stops when dropped.
pub struct CannedServer {
    base_url: String,
    requests: Arc<RwLock<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl CannedServer {
    pub async fn start(response: CannedResponse) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);
        let requests = Arc::new(RwLock::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let response = response.clone();
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    if let Some(line) = serve(stream, &response).await {
                        recorded.write().await.push(line);
                    }
                });
            }
        });

        Ok(Self {
            base_url,
            requests,
            handle,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request lines received so far, e.g. `GET /search?q=x HTTP/1.1`.
    pub async fn request_lines(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Read one request head, answer it, return its request line.
async fn serve(mut stream: TcpStream, response: &CannedResponse) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    stream.write_all(&response.to_bytes()).await.ok()?;
    stream.shutdown().await.ok()?;

    let head = String::from_utf8_lossy(&buf);
    head.lines().next().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_canned_response() {
        let server = CannedServer::start(
            CannedResponse::new(418)
                .with_header("X-Test", "yes")
                .with_body("teapot"),
        )
        .await
        .unwrap();

        let response = reqwest::get(format!("{}/brew?kind=earl", server.base_url()))
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 418);
        assert_eq!(response.headers().get("x-test").unwrap(), "yes");
        assert_eq!(response.text().await.unwrap(), "teapot");

        let lines = server.request_lines().await;
        assert_eq!(lines, vec!["GET /brew?kind=earl HTTP/1.1".to_string()]);
    }
}

// crates/muse-core/src/mock_http.rs
//
// Minimal in-process HTTP/1.1 server for exercising the HTTP boundaries in
// tests. Enabled with the `test-util` feature.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Canned response for one request path (query string ignored).
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub path: String,
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl MockRoute {
    pub fn json(path: &str, status: u16, body: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            status,
            content_type: "application/json".to_string(),
            body: body.into().into_bytes(),
        }
    }

    pub fn bytes(path: &str, status: u16, body: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            status,
            content_type: "application/octet-stream".to_string(),
            body: body.to_vec(),
        }
    }
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string.
    pub target: String,
    pub head: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> &str {
        self.target.split_once('?').map(|(_, q)| q).unwrap_or_default()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Handle to a running mock server.
pub struct MockServer {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<RecordedRequest>,
}

impl MockServer {
    /// Start a server answering every connection from `routes`; unknown paths
    /// get a 404. Each response closes its connection.
    pub async fn start(routes: Vec<MockRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    serve_one(stream, &routes, &tx).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests: rx,
        }
    }

    /// Absolute URL for a path on this server.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// All requests received so far.
    pub fn take_requests(&mut self) -> Vec<RecordedRequest> {
        let mut out = Vec::new();
        while let Ok(request) = self.requests.try_recv() {
            out.push(request);
        }
        out
    }
}

// The request is recorded before the response is written, so a client that
// has seen the response can always observe its request.
async fn serve_one(
    mut stream: TcpStream,
    routes: &[MockRoute],
    recorded: &mpsc::UnboundedSender<RecordedRequest>,
) -> Option<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();
    let body = buf[head_end..].to_vec();

    let request = RecordedRequest {
        method,
        target,
        head,
        body,
    };

    let (status, content_type, body) = match routes.iter().find(|r| r.path == request.path()) {
        Some(route) => (route.status, route.content_type.as_str(), route.body.as_slice()),
        None => (404, "text/plain", b"not found".as_slice()),
    };
    let _ = recorded.send(request);

    let header = format!(
        "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(header.as_bytes()).await;
    let _ = stream.write_all(body).await;
    let _ = stream.shutdown().await;

    Some(())
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

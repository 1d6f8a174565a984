//! One-shot HTTP/1.1 server on loopback, used to drive the service clients
//! over a real socket in tests.

use crate::config::Endpoint;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// How the server answers the single request it accepts
#[derive(Debug, Clone)]
pub enum Reply {
    /// Status line and JSON body in one write
    Immediate { status: u16, body: String },
    /// Headers at once, then the body in `chunks` pieces with `gap` between them
    Trickle {
        status: u16,
        body: String,
        chunks: usize,
        gap: Duration,
    },
    /// Read the request, then say nothing for `silence`
    Stall { silence: Duration },
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Immediate {
            status,
            body: body.to_string(),
        }
    }
}

/// What the client actually put on the wire
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// `GET /v1/images?name=... HTTP/1.1`
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

pub struct StubServer {
    pub endpoint: Endpoint,
    handle: JoinHandle<RecordedRequest>,
}

impl StubServer {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            write_reply(&mut socket, reply).await;
            request
        });

        Self {
            endpoint: Endpoint::new("http", "127.0.0.1", port),
            handle,
        }
    }

    /// The request the server received; waits for the reply to be written
    pub async fn request(self) -> RecordedRequest {
        self.handle.await.unwrap()
    }
}

async fn read_request(socket: &mut TcpStream) -> RecordedRequest {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    let head_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break buffer.len();
        }
        buffer.extend_from_slice(&chunk[..read]);
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buffer.len() < head_end + content_length {
        let read = socket.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    RecordedRequest {
        head,
        body: buffer[head_end..].to_vec(),
    }
}

fn status_head(status: u16, length: usize) -> String {
    format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status, length
    )
}

async fn write_reply(socket: &mut TcpStream, reply: Reply) {
    match reply {
        Reply::Immediate { status, body } => {
            let _ = socket.write_all(status_head(status, body.len()).as_bytes()).await;
            let _ = socket.write_all(body.as_bytes()).await;
        }
        Reply::Trickle {
            status,
            body,
            chunks,
            gap,
        } => {
            let _ = socket.write_all(status_head(status, body.len()).as_bytes()).await;
            let _ = socket.flush().await;
            let piece = body.len().div_ceil(chunks.max(1)).max(1);
            for part in body.as_bytes().chunks(piece) {
                tokio::time::sleep(gap).await;
                let _ = socket.write_all(part).await;
                let _ = socket.flush().await;
            }
        }
        Reply::Stall { silence } => tokio::time::sleep(silence).await,
    }
    let _ = socket.shutdown().await;
}

//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use htmx_demo_server::config::ServerConfig;
use htmx_demo_server::proxy::ConnectionGate;
use htmx_demo_server::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Read an HTTP/1.1 request head (up to the blank line).
pub async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Start a programmable backend. `f` receives the request head and returns
/// a status line suffix and body.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let head = read_head(&mut socket).await;
                        let (status, body) = f(head).await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start an endless SSE backend. Each request head is sent on the returned
/// channel; the stream emits an event every 50ms until the peer goes away.
pub async fn start_sse_backend() -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let head = read_head(&mut socket).await;
                let _ = tx.send(head);

                let headers = "HTTP/1.1 200 OK\r\n\
                    Content-Type: text/event-stream\r\n\
                    Cache-Control: max-age=600\r\n\
                    Connection: close\r\n\r\n";
                if socket.write_all(headers.as_bytes()).await.is_err() {
                    return;
                }
                loop {
                    if socket.write_all(b"data: frame\n\n").await.is_err() {
                        break;
                    }
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            });
        }
    });

    (addr, rx)
}

/// Start a backend that promises a 1000-byte body, sends a few bytes and
/// hangs up.
pub async fn start_truncating_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_head(&mut socket).await;
                let response = "HTTP/1.1 200 OK\r\n\
                    Content-Type: text/event-stream\r\n\
                    Content-Length: 1000\r\n\r\n\
                    data: partial\n\n";
                let _ = socket.write_all(response.as_bytes()).await;
                tokio::time::sleep(Duration::from_millis(50)).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing the gate at `upstream` with the given ceiling.
pub fn gate_config(upstream: SocketAddr, max_connections: usize) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.gate.upstream = format!("http://{upstream}");
    config.gate.max_connections = max_connections;
    config.timeouts.upstream_connect_secs = 2;
    config.timeouts.shutdown_drain_secs = 1;
    config
}

/// A running server under test.
pub struct TestServer {
    pub addr: SocketAddr,
    pub gate: Arc<ConnectionGate>,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(config: ServerConfig) -> TestServer {
    let server = HttpServer::new(config).unwrap();
    let gate = server.passthrough().gate().clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.clone();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        gate,
        shutdown,
    }
}

/// Client that never pools idle connections.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Poll until `gate.active()` equals `expected`, failing after 5s.
pub async fn wait_for_active(gate: &ConnectionGate, expected: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while gate.active() != expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "gate stuck at {} active, expected {}",
            gate.active(),
            expected
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

//! Dev server: static site plus buffered `/api/*` forwarding.

use std::net::SocketAddr;
use std::path::Path;

use axum::http::StatusCode;
use htmx_demo_server::devserver::dev_router;
use tokio::net::TcpListener;

mod common;

async fn start_dev_server(site_dir: &Path, backend: SocketAddr) -> SocketAddr {
    let app = dev_router(site_dir, &format!("http://{backend}"));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn site_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("dev-site-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Hei</h1>").unwrap();
    dir
}

#[tokio::test]
async fn api_calls_are_forwarded_with_method_path_and_content_type() {
    let backend = common::start_programmable_backend(|head| async move {
        let line = head.lines().next().unwrap_or_default().to_string();
        let content_type = head
            .lines()
            .find(|l| l.to_ascii_lowercase().starts_with("content-type:"))
            .unwrap_or_default()
            .to_ascii_lowercase();
        (200, format!("{line}|{content_type}"))
    })
    .await;
    let dir = site_dir("forward");
    let addr = start_dev_server(&dir, backend).await;
    let client = common::client();

    let body = client
        .get(format!("http://{addr}/api/people?x=1"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.starts_with("GET /api/people?x=1 HTTP/1.1|"));
    assert!(body.ends_with("content-type: application/x-www-form-urlencoded"));

    let response = client
        .post(format!("http://{addr}/api/people"))
        .header("content-type", "application/json")
        .body(r#"{"name":"Jo"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "text/html");
    let body = response.text().await.unwrap();
    assert!(body.starts_with("POST /api/people HTTP/1.1|"));
    assert!(body.ends_with("content-type: application/json"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn backend_status_is_preserved() {
    let backend = common::start_programmable_backend(|_| async { (404, "<p>nei</p>".into()) }).await;
    let dir = site_dir("status");
    let addr = start_dev_server(&dir, backend).await;

    let response = common::client()
        .get(format!("http://{addr}/api/people/9/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.text().await.unwrap(), "<p>nei</p>");

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn site_files_are_served_locally() {
    let backend = common::closed_port().await;
    let dir = site_dir("static");
    let addr = start_dev_server(&dir, backend).await;
    let client = common::client();

    let response = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "<h1>Hei</h1>");

    let response = client
        .get(format!("http://{addr}/nowhere.html"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn backend_down_is_a_bad_gateway() {
    let backend = common::closed_port().await;
    let dir = site_dir("down");
    let addr = start_dev_server(&dir, backend).await;

    let response = common::client()
        .get(format!("http://{addr}/api/quote"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.text().await.unwrap().starts_with("Proxy error:"));

    let _ = std::fs::remove_dir_all(&dir);
}

//! Local REST service shared by the integration tests
//!
//! The service runs on its own tokio runtime in a dedicated thread since the
//! client under test blocks and must not be driven from inside a runtime.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::sync::mpsc;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

pub const ETAG: &str = "\"1234\"";
pub const LAST_MODIFIED: &str = "Sun, 06 Nov 1994 08:49:37 GMT";

static SERVER: OnceLock<SocketAddr> = OnceLock::new();

/// Base URL of the running service, starting it on first use
pub fn base_url() -> String {
    let addr = SERVER.get_or_init(spawn_server);
    format!("http://{addr}")
}

pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

fn spawn_server() -> SocketAddr {
    let (tx, rx) = mpsc::channel();

    std::thread::Builder::new()
        .name("test-server".into())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind");
                let addr = listener.local_addr().expect("local addr");
                let _ = tx.send(addr);

                axum::serve(listener, routes())
                    .await
                    .expect("serve");
            });
        })
        .expect("spawn server thread");

    rx.recv_timeout(Duration::from_secs(10))
        .expect("server did not start")
}

fn routes() -> Router {
    Router::new()
        .route(
            "/user",
            get(|| async { json(r#"[{"id":1,"name":"Matilda"}]"#) })
                .post(|| async { (StatusCode::CREATED, json(r#"{"id":2}"#)) })
                .options(|| async { ([(header::ALLOW, "GET, POST, HEAD, OPTIONS")], "") }),
        )
        .route(
            "/user/:id",
            get(|Path(id): Path<u32>| async move { json(format!(r#"{{"id":{id}}}"#)) })
                .put(|Path(id): Path<u32>| async move { json(format!(r#"{{"id":{id},"updated":true}}"#)) })
                .patch(|Path(id): Path<u32>| async move { json(format!(r#"{{"id":{id},"patched":true}}"#)) })
                .delete(|| async { StatusCode::NO_CONTENT }),
        )
        .route(
            "/items/:id",
            get(|Path(id): Path<String>| async move {
                ([(header::CACHE_CONTROL, "max-age=60")], format!("item {id}"))
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                "slow"
            }),
        )
        .route(
            "/slow/cached",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                ([(header::CACHE_CONTROL, "max-age=60")], "slow")
            }),
        )
        .route(
            "/sleep/:ms",
            get(|Path(ms): Path<u64>| async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                "awake"
            }),
        )
        .route("/cache/etag", get(etag))
        .route("/cache/lastmodified", get(last_modified))
}

async fn etag(headers: HeaderMap) -> Response {
    if headers.get(header::IF_NONE_MATCH).is_some_and(|v| v == ETAG) {
        return (StatusCode::NOT_MODIFIED, [(header::CACHE_CONTROL, "max-age=60")]).into_response();
    }
    (
        [(header::ETAG, ETAG), (header::CACHE_CONTROL, "no-cache")],
        "etag body",
    )
        .into_response()
}

async fn last_modified(headers: HeaderMap) -> Response {
    if headers.get(header::IF_MODIFIED_SINCE).is_some_and(|v| v == LAST_MODIFIED) {
        return StatusCode::NOT_MODIFIED.into_response();
    }
    (
        [(header::LAST_MODIFIED, LAST_MODIFIED), (header::CACHE_CONTROL, "no-cache")],
        "last-modified body",
    )
        .into_response()
}

fn json(body: impl Into<String>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body.into()).into_response()
}

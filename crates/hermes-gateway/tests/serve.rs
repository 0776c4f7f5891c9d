//! Serving over real TCP connections.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hermes_bind::Bindable;
use hermes_core::{handler_fn, Empty, RequestContext, RpcError};
use hermes_gateway::{Endpoint, Gateway, GatewayConfig, GatewayError, ShutdownSignal};
use hermes_middleware::stages::{RequestIdMiddleware, REQUEST_ID_HEADER};
use http::{Method, StatusCode};
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

#[derive(Debug, Default, Deserialize, Bindable)]
#[serde(default)]
struct Echo {
    id: String,
    text: String,
}

struct Running {
    addr: SocketAddr,
    shutdown: ShutdownSignal,
    task: JoinHandle<Result<(), GatewayError>>,
}

async fn start(config: GatewayConfig) -> Running {
    start_with(config, Vec::new()).await
}

async fn start_with(config: GatewayConfig, extra: Vec<Endpoint>) -> Running {
    let mut gateway = Gateway::builder()
        .name("EchoService")
        .config(config)
        .middleware(RequestIdMiddleware::new())
        .build();
    gateway
        .register(Endpoint::new(
            Method::POST,
            "/echo/:ID",
            "EchoService",
            "Echo",
            handler_fn(|_ctx: &RequestContext, req: Echo| async move {
                Ok::<_, RpcError>(format!("{}:{}", req.id, req.text))
            }),
        ))
        .unwrap();
    gateway.register_all(extra).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();
    let task = tokio::spawn(gateway.serve_with_shutdown(listener, shutdown.clone()));

    Running {
        addr,
        shutdown,
        task,
    }
}

struct RawResponse {
    status: StatusCode,
    head: String,
    body: String,
}

async fn send(addr: SocketAddr, method: &str, path: &str, body: &str) -> RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    let code = head.split_whitespace().nth(1).unwrap();
    RawResponse {
        status: StatusCode::from_bytes(code.as_bytes()).unwrap(),
        head: head.to_ascii_lowercase(),
        body: body.to_string(),
    }
}

#[tokio::test]
async fn serves_requests_until_shutdown() {
    let running = start(GatewayConfig::default()).await;

    let response = send(running.addr, "POST", "/echo/abc?id=ignored", r#"{"text":"hi"}"#).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, r#""abc:hi""#);
    assert!(response.head.contains(REQUEST_ID_HEADER), "{}", response.head);

    let response = send(running.addr, "GET", "/echo/abc", "").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    running.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), running.task)
        .await
        .expect("server should stop")
        .expect("server task should not panic");
    assert!(result.is_ok());
}

#[tokio::test]
async fn oversized_bodies_are_rejected_before_dispatch() {
    let config = GatewayConfig::builder().max_body_bytes(8).build();
    let running = start(config).await;

    let response = send(
        running.addr,
        "POST",
        "/echo/abc",
        r#"{"text":"far too long for the limit"}"#,
    )
    .await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.body.contains("PAYLOAD_TOO_LARGE"), "{}", response.body);

    running.shutdown.trigger();
    running.task.await.unwrap().unwrap();
}

#[tokio::test]
async fn serve_rejects_bad_address() {
    let gateway = Gateway::new("EchoService");
    let err = gateway.serve("not an address").await.unwrap_err();
    assert!(matches!(err, GatewayError::InvalidAddress(_)));
}

#[tokio::test]
async fn client_disconnect_cancels_the_request() {
    let started = Arc::new(Notify::new());
    let abandoned = Arc::new(Notify::new());

    let (on_start, on_abandon) = (Arc::clone(&started), Arc::clone(&abandoned));
    let hang = Endpoint::new(
        Method::POST,
        "/hang",
        "EchoService",
        "Hang",
        handler_fn(move |ctx: &RequestContext, _req: Empty| {
            let token = ctx.cancellation_token().clone();
            let on_start = Arc::clone(&on_start);
            let on_abandon = Arc::clone(&on_abandon);
            async move {
                tokio::spawn(async move {
                    token.cancelled().await;
                    on_abandon.notify_one();
                });
                on_start.notify_one();
                std::future::pending::<()>().await;
                Ok::<_, RpcError>(())
            }
        }),
    );
    let running = start_with(GatewayConfig::default(), vec![hang]).await;

    let mut stream = TcpStream::connect(running.addr).await.unwrap();
    stream
        .write_all(b"POST /hang HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\n\r\n")
        .await
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), started.notified())
        .await
        .expect("handler should start");

    drop(stream);
    tokio::time::timeout(Duration::from_secs(5), abandoned.notified())
        .await
        .expect("request token should be cancelled once the client goes away");

    running.shutdown.trigger();
}

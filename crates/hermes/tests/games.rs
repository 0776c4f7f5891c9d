//! The game service wired through the facade only.

use bytes::Bytes;
use hermes::middleware::Response;
use hermes::prelude::*;
use http_body_util::{BodyExt, Full};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize, Bindable)]
#[serde(default)]
#[bind(crate = "hermes::bind")]
struct GetGame {
    id: String,
}

#[derive(Debug, Default, Deserialize, Bindable)]
#[serde(default)]
#[bind(crate = "hermes::bind")]
struct NewGame {
    name: String,
}

#[derive(Debug, Serialize)]
struct Game {
    id: String,
    name: String,
}

fn gateway() -> Gateway {
    let config = ConfigLoader::new()
        .with_string("[server]\npath_prefix = \"/v2\"\n", "toml")
        .unwrap()
        .load()
        .unwrap();

    let mut gateway = Gateway::builder()
        .name("GameService")
        .config(config.gateway_config())
        .middleware(RequestIdMiddleware::new())
        .build();

    gateway
        .register(Endpoint::new(
            Method::GET,
            "/game/:ID",
            "GameService",
            "GetByID",
            handler_fn(|_ctx: &RequestContext, req: GetGame| async move {
                if req.id == "missing" {
                    return Err(RpcError::not_found("no such game"));
                }
                Ok(Game {
                    id: req.id,
                    name: "chess".into(),
                })
            }),
        ))
        .unwrap();
    gateway
        .register(
            Endpoint::new(
                Method::POST,
                "/game",
                "GameService",
                "Register",
                handler_fn(|_ctx: &RequestContext, req: NewGame| async move {
                    Ok::<_, RpcError>(Game {
                        id: "g-1".into(),
                        name: req.name,
                    })
                }),
            )
            .with_status(StatusCode::CREATED),
        )
        .unwrap();
    gateway
}

fn request(method: Method, uri: &str, body: &str) -> http::Request<Full<Bytes>> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

async fn json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_by_id() {
    let response = gateway()
        .handle(request(Method::GET, "/v2/game/abc", ""))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(json(response).await["id"], "abc");
}

#[tokio::test]
async fn register_returns_created() {
    let response = gateway()
        .handle(request(Method::POST, "/v2/game", r#"{"name":"go"}"#))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json(response).await["name"], "go");
}

#[tokio::test]
async fn handler_error_maps_to_status() {
    let response = gateway()
        .handle(request(Method::GET, "/v2/game/missing", ""))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(response).await["message"], "no such game");
}

//! The game service: an in-memory store and its two operations.

use std::collections::HashMap;
use std::sync::Arc;

use hermes::prelude::*;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Service name used for routing, logs and metrics.
pub const SERVICE: &str = "GameService";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub name: String,
    pub players: u8,
}

#[derive(Debug, Default)]
pub struct GameStore {
    games: RwLock<HashMap<String, Game>>,
}

impl GameStore {
    pub fn get(&self, id: &str) -> Option<Game> {
        self.games.read().get(id).cloned()
    }

    pub fn insert(&self, name: String, players: u8) -> Game {
        let game = Game {
            id: Uuid::now_v7().to_string(),
            name,
            players,
        };
        self.games.write().insert(game.id.clone(), game.clone());
        game
    }
}

#[derive(Debug, Default, Deserialize, Bindable)]
#[serde(default)]
#[bind(crate = "hermes::bind")]
pub struct GetByIdRequest {
    pub id: String,
}

#[derive(Debug, Default, Deserialize, Bindable)]
#[serde(default)]
#[bind(crate = "hermes::bind")]
pub struct RegisterRequest {
    pub name: String,
    pub players: u8,
}

pub struct GetById {
    store: Arc<GameStore>,
}

impl Handler<GetByIdRequest, Game> for GetById {
    async fn handle(&self, _ctx: &RequestContext, req: GetByIdRequest) -> RpcResult<Game> {
        self.store
            .get(&req.id)
            .ok_or_else(|| RpcError::not_found(format!("no game '{}'", req.id)))
    }
}

pub struct Register {
    store: Arc<GameStore>,
}

impl Handler<RegisterRequest, Game> for Register {
    async fn handle(&self, ctx: &RequestContext, req: RegisterRequest) -> RpcResult<Game> {
        if req.name.trim().is_empty() {
            return Err(RpcError::validation("name is required"));
        }
        if req.players == 0 {
            return Err(RpcError::validation("players must be at least 1"));
        }

        let game = self.store.insert(req.name, req.players);
        tracing::info!(request_id = %ctx.request_id(), game_id = %game.id, "game registered");
        Ok(game)
    }
}

/// `GET /game/:ID` and `POST /game` over a shared store.
pub fn endpoints(store: &Arc<GameStore>) -> [Endpoint; 2] {
    [
        Endpoint::new(
            Method::GET,
            "/game/:ID",
            SERVICE,
            "GetByID",
            GetById {
                store: Arc::clone(store),
            },
        ),
        Endpoint::new(
            Method::POST,
            "/game",
            SERVICE,
            "Register",
            Register {
                store: Arc::clone(store),
            },
        )
        .with_status(StatusCode::CREATED),
    ]
}

//! Serves the GameService demo.
//!
//! ```text
//! cargo run -p hermes-demo-games
//! curl -X POST localhost:9001/v2/game -d '{"name":"chess","players":2}'
//! curl localhost:9001/v2/game/<id>
//! ```

mod games;

use std::sync::Arc;

use hermes::prelude::*;
use hermes::telemetry::{init_logging, init_metrics};

const BUILTIN_CONFIG: &str = include_str!("../games.toml");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new()
        .with_dotenv()?
        .with_string(BUILTIN_CONFIG, "toml")?;
    if let Ok(path) = std::env::var("GAMES_CONFIG") {
        loader = loader.with_file(path)?;
    }
    let config = loader.with_env_prefix("HERMES").load()?;

    init_logging(&config.log_config())?;
    init_metrics(&config.metrics_config())?;

    let store = Arc::new(games::GameStore::default());
    let mut gateway = Gateway::builder()
        .name(games::SERVICE)
        .config(config.gateway_config())
        .middleware(RequestIdMiddleware::new())
        .middleware(AccessLog::new())
        .build();
    gateway.register_all(games::endpoints(&store))?;

    gateway.serve(&config.server.http_addr).await?;
    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use trivia_api::db::{self, SqliteStore};
use trivia_api::quiz::{RandomSource, SeededRandom, ThreadRandom};
use trivia_api::server::{run_server, AppState};
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load().context("Failed to load settings")?;
    let pool = db::establish_connection(&settings.db_path)
        .await
        .with_context(|| format!("Cannot open database at {}", settings.db_path))?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;

    let store = Arc::new(SqliteStore::new(pool));
    let random: Arc<dyn RandomSource> = match settings.random_seed {
        Some(seed) => {
            tracing::info!(seed, "Quiz questions are picked with a fixed seed");
            Arc::new(SeededRandom::new(seed))
        }
        None => Arc::new(ThreadRandom),
    };
    let state = AppState::new(store, random);
    run_server(state, &settings.address()).await
}

use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, DatabaseConfig};
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::restaurant::repo::seaorm::SeaOrmRestaurantRepository;
use service::restaurant::repository::{memory::InMemoryRestaurantRepository, RestaurantRepository};
use service::restaurant::seed::seed_sample_data;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Pick the repository for `[database]`, migrating PostgreSQL first.
async fn build_repository(cfg: &DatabaseConfig) -> anyhow::Result<Arc<dyn RestaurantRepository>> {
    if cfg.is_memory() {
        info!("using in-memory restaurant store");
        return Ok(Arc::new(InMemoryRestaurantRepository::new()));
    }
    let db = models::db::connect_with_config(cfg).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");
    Ok(Arc::new(SeaOrmRestaurantRepository::new(db)))
}

/// Repository, optional sample data, and the handler state wrapping them.
pub async fn build_state(cfg: &DatabaseConfig) -> anyhow::Result<ServerState> {
    let state = ServerState::new(build_repository(cfg).await?);
    if cfg.seed_data {
        let created = seed_sample_data(state.restaurants.as_ref()).await?;
        info!(created, "seed finished");
    }
    Ok(state)
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run(mut cfg: AppConfig) -> anyhow::Result<()> {
    cfg.normalize_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let state = build_state(&cfg.database).await?;
    let app = build_app(state);

    // Bind and serve
    let addr: SocketAddr = cfg.server.bind_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "restaurant server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

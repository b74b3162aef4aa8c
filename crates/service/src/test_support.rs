#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

fn test_db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::load_default().map(|c| c.database).unwrap_or_default();
    cfg.normalize_from_env();
    if cfg.url.trim().is_empty() || cfg.is_memory() {
        cfg.url = models::db::DATABASE_URL.clone();
    }
    cfg.min_connections = cfg.min_connections.clamp(1, 2);
    cfg.max_connections = cfg.max_connections.max(5);
    cfg.acquire_timeout_secs = 10;
    cfg
}

/// Migrated PostgreSQL connection, or `None` when database tests should be skipped.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let migrated = MIGRATED
        .get_or_init(|| async {
            // Throwaway connection; the test runtime that created it may end first
            let db = match connect_with_config(&test_db_config()).await {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    return false;
                }
            };
            if let Err(e) = migration::Migrator::up(&db, None).await {
                eprintln!("skip: migrate up failed: {}", e);
                return false;
            }
            true
        })
        .await;
    if !*migrated {
        return None;
    }
    connect_with_config(&test_db_config()).await.ok()
}

#![cfg(test)]
use tokio::sync::OnceCell;
use migration::MigratorTrait;
use models::db::connect_with_config;
use configs::DatabaseConfig;

use crate::storage::Storage;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

pub fn memory_storage() -> Storage {
    Storage::in_memory()
}

/// Postgres-backed storage when `DATABASE_URL` is set and `SKIP_DB_TESTS` is not.
pub async fn postgres_storage() -> Option<Storage> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let url = std::env::var("DATABASE_URL").ok()?;
    let cfg = DatabaseConfig { url, min_connections: 1, ..Default::default() };

    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&cfg).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;

    // Fresh connection for the current test's runtime
    let db = connect_with_config(&cfg).await.ok()?;
    Some(Storage::postgres(db))
}

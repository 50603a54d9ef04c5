use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(database_url: &str) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(database_url, 1, 30).await
}

/// Opens a pool, creating the database file on first use.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::connect_with_settings;

    #[tokio::test]
    async fn file_database_is_created_on_first_connect() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("atelier.db");
        let url = format!("sqlite://{}", path.display());

        let pool = connect_with_settings(&url, 1, 5).await.expect("connect");
        sqlx::query("SELECT 1").execute(&pool).await.expect("query");

        assert!(path.exists());
    }

    #[tokio::test]
    async fn zero_connection_limit_is_raised_to_one() {
        let pool = connect_with_settings("sqlite::memory:", 0, 0).await.expect("connect");
        sqlx::query("SELECT 1").execute(&pool).await.expect("query");
    }
}

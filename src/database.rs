use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::Row;
use sqlx::SqlitePool;

use crate::models::ChatRole;
use crate::models::ChatTurn;
use crate::Result;

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections())
            .acquire_timeout(std::time::Duration::from_secs(config.connection_timeout()));

        let pool = pool_options.connect(config.database_url()).await?;
        let database = Self::new(pool);
        database.init_schema().await?;
        Ok(database)
    }

    /// Get a reference to the database pool for raw queries
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize database schema
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                role TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Append a conversation turn. Each turn commits independently; there
    /// is no transaction spanning a question's user and bot turns.
    pub async fn append_chat_turn(&self, role: ChatRole, message: &str) -> Result<()> {
        sqlx::query("INSERT INTO chat_history (role, message, timestamp) VALUES (?1, ?2, ?3)")
            .bind(role.as_str())
            .bind(message)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all conversation turns, oldest first
    pub async fn list_chat_turns(&self) -> Result<Vec<ChatTurn>> {
        let rows = sqlx::query(
            "SELECT id, role, message, timestamp FROM chat_history ORDER BY timestamp ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let turns = rows
            .iter()
            .map(|row| ChatTurn {
                id: row.get("id"),
                role: ChatRole::from(row.get::<String, _>("role").as_str()),
                message: row.get("message"),
                timestamp: row.get("timestamp"),
            })
            .collect();

        Ok(turns)
    }

    /// Count persisted conversation turns
    pub async fn count_chat_turns(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chat_history")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_database() -> Database {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let database = Database::new(pool);
        database.init_schema().await.unwrap();
        database
    }

    #[tokio::test]
    async fn test_append_and_list_turns() {
        let database = memory_database().await;

        database
            .append_chat_turn(ChatRole::User, "Apa ibu kota Indonesia?")
            .await
            .unwrap();
        database
            .append_chat_turn(ChatRole::Bot, "Jakarta.")
            .await
            .unwrap();

        let turns = database.list_chat_turns().await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].message, "Apa ibu kota Indonesia?");
        assert_eq!(turns[1].role, ChatRole::Bot);
        assert!(turns[0].timestamp <= turns[1].timestamp);
    }

    #[tokio::test]
    async fn test_count_turns() {
        let database = memory_database().await;
        assert_eq!(database.count_chat_turns().await.unwrap(), 0);

        database
            .append_chat_turn(ChatRole::User, "halo")
            .await
            .unwrap();
        assert_eq!(database.count_chat_turns().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let database = memory_database().await;
        database.init_schema().await.unwrap();
        database.init_schema().await.unwrap();
    }
}

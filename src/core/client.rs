// SPDX-License-Identifier: GPL-3.0-only

use std::{fs, sync::Arc};

use sqlx::{Pool, Sqlite, SqlitePool, sqlite::SqlitePoolOptions};

const DB_NAME: &str = "cardbox.db";

/// Handle over the data store. Constructed explicitly and passed to every
/// operation that touches the store, connected with [`StoreClient::connect`]
/// (or [`StoreClient::connect_in_memory`] for tests) and torn down with
/// [`StoreClient::close`].
#[derive(Debug, Clone)]
pub struct StoreClient {
    pool: Arc<Pool<Sqlite>>,
}

impl StoreClient {
    /// Open (creating it on first run) the application database
    pub async fn connect(app_id: &str) -> Result<Self, anywho::Error> {
        let db_path = dirs::data_dir()
            .ok_or_else(|| anywho::anywho!("Failed to get data directory"))?
            .join(app_id)
            .join("database")
            .join(DB_NAME);
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let conn_str = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = SqlitePool::connect(&conn_str).await?;
        tracing::debug!("connected to database at {}", db_path.display());

        create_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open an in-memory database, limited to a single connection so every
    /// query sees the same store
    pub async fn connect_in_memory() -> Result<Self, anywho::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        create_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub(crate) fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Close the underlying connection pool, waiting for in-flight queries
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("store client closed");
    }
}

async fn create_schema(pool: &Pool<Sqlite>) -> Result<(), anywho::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS study_sets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            study_set_id INTEGER NOT NULL,
            term TEXT NOT NULL,
            definition TEXT NOT NULL,
            position INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            UNIQUE (study_set_id, position),
            FOREIGN KEY (study_set_id) REFERENCES study_sets(id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS starred_flashcards (
            user_id TEXT NOT NULL,
            flashcard_id INTEGER NOT NULL,
            PRIMARY KEY (user_id, flashcard_id),
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
            FOREIGN KEY (flashcard_id) REFERENCES flashcards(id) ON DELETE CASCADE
        );
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("schema ready");
    Ok(())
}

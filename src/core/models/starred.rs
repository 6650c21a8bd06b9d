// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::core::client::StoreClient;

/// Per-user favorite marker for a flashcard. Stored as an association row,
/// never as a column on the flashcard itself, so star state is always
/// relative to the requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarredFlashcard {
    pub user_id: String,
    pub flashcard_id: i64,
}

impl StarredFlashcard {
    /// Toggle the star for (user, flashcard) inside a single transaction and
    /// return the new state: `true` means now starred.
    pub async fn toggle(
        client: &StoreClient,
        user_id: &str,
        flashcard_id: i64,
    ) -> Result<bool, anywho::Error> {
        let mut tx = client.pool().begin().await?;

        let existing =
            sqlx::query("SELECT 1 FROM starred_flashcards WHERE user_id = $1 AND flashcard_id = $2")
                .bind(user_id)
                .bind(flashcard_id)
                .fetch_optional(&mut *tx)
                .await?;

        let now_starred = if existing.is_some() {
            sqlx::query("DELETE FROM starred_flashcards WHERE user_id = $1 AND flashcard_id = $2")
                .bind(user_id)
                .bind(flashcard_id)
                .execute(&mut *tx)
                .await?;

            false
        } else {
            sqlx::query("INSERT INTO starred_flashcards (user_id, flashcard_id) VALUES (?, ?)")
                .bind(user_id)
                .bind(flashcard_id)
                .execute(&mut *tx)
                .await?;

            true
        };

        tx.commit().await?;

        Ok(now_starred)
    }

    /// Whether the user has starred the given flashcard
    pub async fn is_starred(
        client: &StoreClient,
        user_id: &str,
        flashcard_id: i64,
    ) -> Result<bool, anywho::Error> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS stars FROM starred_flashcards WHERE user_id = $1 AND flashcard_id = $2",
        )
        .bind(user_id)
        .bind(flashcard_id)
        .fetch_one(client.pool())
        .await?;

        Ok(row.try_get::<i64, _>("stars")? > 0)
    }
}

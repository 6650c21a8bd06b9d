// SPDX-License-Identifier: GPL-3.0-only

use futures::stream::TryStreamExt;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::core::{client::StoreClient, utils};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySet {
    pub id: Option<i64>,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    /// Number of flashcards in the set, computed per request and never stored
    pub card_count: i64,
}

const SELECT_WITH_COUNT: &str = r#"
    SELECT s.id, s.user_id, s.title, s.description, s.created_at, s.updated_at,
        (SELECT COUNT(*) FROM flashcards f WHERE f.study_set_id = s.id) AS card_count
    FROM study_sets s
"#;

impl StudySet {
    /// Get all the [`StudySet`] of the given user, newest-updated first
    pub async fn get_all(
        client: &StoreClient,
        user_id: &str,
    ) -> Result<Vec<StudySet>, anywho::Error> {
        let query = format!("{SELECT_WITH_COUNT} WHERE s.user_id = $1 ORDER BY s.updated_at DESC, s.id DESC");
        let mut rows = sqlx::query(&query).bind(user_id).fetch(client.pool());

        let mut result = Vec::<StudySet>::new();

        while let Some(row) = rows.try_next().await? {
            result.push(StudySet {
                id: Some(row.try_get("id")?),
                user_id: row.try_get("user_id")?,
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
                card_count: row.try_get("card_count")?,
            });
        }

        Ok(result)
    }

    /// Get a single [`StudySet`] with its card count, `Ok(None)` if it does not exist
    pub async fn get(client: &StoreClient, set_id: i64) -> Result<Option<StudySet>, anywho::Error> {
        let query = format!("{SELECT_WITH_COUNT} WHERE s.id = $1");
        let row = sqlx::query(&query)
            .bind(set_id)
            .fetch_optional(client.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(StudySet {
                id: Some(row.try_get("id")?),
                user_id: row.try_get("user_id")?,
                title: row.try_get("title")?,
                description: row.try_get("description")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
                card_count: row.try_get("card_count")?,
            })),
            None => Ok(None),
        }
    }

    /// Add a [`StudySet`] for the given user and return it
    pub async fn add(
        client: &StoreClient,
        user_id: &str,
        title: &str,
        description: Option<&str>,
    ) -> Result<StudySet, anywho::Error> {
        let title = title.trim();
        if title.is_empty() {
            return Err(anywho::anywho!("A study set needs a non-empty title"));
        }

        let now = utils::unix_timestamp();
        let id = sqlx::query(
            "INSERT INTO study_sets (user_id, title, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(now)
        .bind(now)
        .fetch_one(client.pool())
        .await?
        .try_get::<i64, _>("id")?;

        Ok(StudySet {
            id: Some(id),
            user_id: user_id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            created_at: now,
            updated_at: now,
            card_count: 0,
        })
    }

    /// Edit the title/description of a [`StudySet`], bumping its updated timestamp
    pub async fn edit(client: &StoreClient, studyset: &StudySet) -> Result<(), anywho::Error> {
        if studyset.title.trim().is_empty() {
            return Err(anywho::anywho!("A study set needs a non-empty title"));
        }

        sqlx::query("UPDATE study_sets SET title = $1, description = $2, updated_at = $3 WHERE id = $4")
            .bind(studyset.title.trim())
            .bind(&studyset.description)
            .bind(utils::unix_timestamp())
            .bind(studyset.id)
            .execute(client.pool())
            .await?;

        Ok(())
    }

    /// Delete a [`StudySet`], its flashcards and their star rows in a single
    /// transaction. Returns whether the set existed.
    pub async fn delete(client: &StoreClient, set_id: i64) -> Result<bool, anywho::Error> {
        let mut tx = client.pool().begin().await?;

        sqlx::query(
            "DELETE FROM starred_flashcards
             WHERE flashcard_id IN (SELECT id FROM flashcards WHERE study_set_id = ?)",
        )
        .bind(set_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM flashcards WHERE study_set_id = ?")
            .bind(set_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM study_sets WHERE id = ?")
            .bind(set_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }
}

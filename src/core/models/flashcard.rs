// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashSet;

use futures::stream::TryStreamExt;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::core::{client::StoreClient, utils};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: Option<i64>,
    pub study_set_id: i64,
    pub term: String,
    pub definition: String,
    /// Display order inside the set, unique per set
    pub position: i64,
    pub created_at: i64,
    /// Per-viewer star state; `None` when the list was fetched without a viewer
    pub is_starred: Option<bool>,
}

impl Flashcard {
    /// Get all the [`Flashcard`] of the given set ordered by position. When a
    /// viewer is given, a second query against their star rows populates
    /// `is_starred` for every card.
    pub async fn get_all(
        client: &StoreClient,
        set_id: i64,
        viewer: Option<&str>,
    ) -> Result<Vec<Flashcard>, anywho::Error> {
        let mut rows = sqlx::query(
            "SELECT id, study_set_id, term, definition, position, created_at
             FROM flashcards WHERE study_set_id = $1 ORDER BY position ASC",
        )
        .bind(set_id)
        .fetch(client.pool());

        let mut result = Vec::<Flashcard>::new();

        while let Some(row) = rows.try_next().await? {
            result.push(Flashcard {
                id: Some(row.try_get("id")?),
                study_set_id: row.try_get("study_set_id")?,
                term: row.try_get("term")?,
                definition: row.try_get("definition")?,
                position: row.try_get("position")?,
                created_at: row.try_get("created_at")?,
                is_starred: None,
            });
        }

        if let Some(user_id) = viewer {
            let starred = starred_ids(client, set_id, user_id).await?;
            for flashcard in &mut result {
                let id = flashcard.id.unwrap_or_default();
                flashcard.is_starred = Some(starred.contains(&id));
            }
        }

        Ok(result)
    }

    /// Add a [`Flashcard`] at the end of the given set and return it
    pub async fn add(
        client: &StoreClient,
        set_id: i64,
        term: &str,
        definition: &str,
    ) -> Result<Flashcard, anywho::Error> {
        let term = term.trim();
        let definition = definition.trim();
        if term.is_empty() || definition.is_empty() {
            return Err(anywho::anywho!(
                "A flashcard needs both a term and a definition"
            ));
        }

        let now = utils::unix_timestamp();
        let mut tx = client.pool().begin().await?;

        let position = next_position(&mut tx, set_id).await?;
        let id = sqlx::query(
            "INSERT INTO flashcards (study_set_id, term, definition, position, created_at)
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(set_id)
        .bind(term)
        .bind(definition)
        .bind(position)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?
        .try_get::<i64, _>("id")?;

        touch_set(&mut tx, set_id, now).await?;
        tx.commit().await?;

        Ok(Flashcard {
            id: Some(id),
            study_set_id: set_id,
            term: term.to_string(),
            definition: definition.to_string(),
            position,
            created_at: now,
            is_starred: None,
        })
    }

    /// Add multiple (term, definition) pairs to the set inside one transaction
    pub async fn add_bulk(
        client: &StoreClient,
        set_id: i64,
        cards: Vec<(String, String)>,
    ) -> Result<(), anywho::Error> {
        let now = utils::unix_timestamp();
        let mut tx = client.pool().begin().await?;

        let mut position = next_position(&mut tx, set_id).await?;
        for (term, definition) in cards {
            sqlx::query(
                "INSERT INTO flashcards (study_set_id, term, definition, position, created_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(set_id)
            .bind(term.trim())
            .bind(definition.trim())
            .bind(position)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            position += 1;
        }

        touch_set(&mut tx, set_id, now).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Delete a [`Flashcard`] and its star rows in a single transaction.
    /// Returns whether the card existed.
    pub async fn delete(client: &StoreClient, flashcard_id: i64) -> Result<bool, anywho::Error> {
        let mut tx = client.pool().begin().await?;

        sqlx::query("DELETE FROM starred_flashcards WHERE flashcard_id = ?")
            .bind(flashcard_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM flashcards WHERE id = ?")
            .bind(flashcard_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        Ok(deleted > 0)
    }
}

/// Ids of the cards in the set the user has starred
async fn starred_ids(
    client: &StoreClient,
    set_id: i64,
    user_id: &str,
) -> Result<HashSet<i64>, anywho::Error> {
    let mut rows = sqlx::query(
        "SELECT sf.flashcard_id FROM starred_flashcards sf
         JOIN flashcards f ON f.id = sf.flashcard_id
         WHERE sf.user_id = $1 AND f.study_set_id = $2",
    )
    .bind(user_id)
    .bind(set_id)
    .fetch(client.pool());

    let mut result = HashSet::new();

    while let Some(row) = rows.try_next().await? {
        result.insert(row.try_get::<i64, _>("flashcard_id")?);
    }

    Ok(result)
}

async fn next_position(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    set_id: i64,
) -> Result<i64, anywho::Error> {
    let position = sqlx::query("SELECT COALESCE(MAX(position) + 1, 0) AS next FROM flashcards WHERE study_set_id = ?")
        .bind(set_id)
        .fetch_one(&mut **tx)
        .await?
        .try_get::<i64, _>("next")?;

    Ok(position)
}

async fn touch_set(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    set_id: i64,
    now: i64,
) -> Result<(), anywho::Error> {
    sqlx::query("UPDATE study_sets SET updated_at = $1 WHERE id = $2")
        .bind(now)
        .bind(set_id)
        .execute(&mut **tx)
        .await?;

    Ok(())
}

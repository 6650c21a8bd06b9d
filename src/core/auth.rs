// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use sqlx::Row;
use tokio::sync::broadcast;

use crate::core::{client::StoreClient, utils};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SignedIn(UserIdentity),
    SignedOut,
}

/// Session boundary of the store: sign-in/out, the current-session query and
/// a change-notification stream. Constructed explicitly next to the
/// [`StoreClient`]; the only state it holds is the active session token and
/// the event channel.
#[derive(Debug)]
pub struct Auth {
    token: Mutex<Option<String>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for Auth {
    fn default() -> Self {
        Self::new()
    }
}

impl Auth {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);

        Self {
            token: Mutex::new(None),
            events,
        }
    }

    /// Sign in by email, creating the user on first sight, and open a session
    pub async fn sign_in(
        &self,
        client: &StoreClient,
        email: &str,
    ) -> Result<UserIdentity, anywho::Error> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(anywho::anywho!("Cannot sign in without an email"));
        }

        let now = utils::unix_timestamp();
        let row = sqlx::query(
            "INSERT INTO users (id, email, created_at) VALUES (?, ?, ?)
             ON CONFLICT(email) DO UPDATE SET email = excluded.email
             RETURNING id, email",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(&email)
        .bind(now)
        .fetch_one(client.pool())
        .await?;

        let user = UserIdentity {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
        };

        let token = uuid::Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(&user.id)
            .bind(now)
            .execute(client.pool())
            .await?;

        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token);
        tracing::debug!("signed in as {}", user.email);
        let _ = self.events.send(SessionEvent::SignedIn(user.clone()));

        Ok(user)
    }

    /// The identity behind the held session token, `Ok(None)` when there is
    /// no token or the session row is gone
    pub async fn current_user(
        &self,
        client: &StoreClient,
    ) -> Result<Option<UserIdentity>, anywho::Error> {
        let token = self
            .token
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let Some(token) = token else {
            return Ok(None);
        };

        let row = sqlx::query(
            "SELECT u.id, u.email FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = $1",
        )
        .bind(&token)
        .fetch_optional(client.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(UserIdentity {
                id: row.try_get("id")?,
                email: row.try_get("email")?,
            })),
            None => Ok(None),
        }
    }

    /// Close the active session, if any
    pub async fn sign_out(&self, client: &StoreClient) -> Result<(), anywho::Error> {
        let token = self.token.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(token) = token else {
            return Ok(());
        };

        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(&token)
            .execute(client.pool())
            .await?;

        tracing::debug!("signed out");
        let _ = self.events.send(SessionEvent::SignedOut);

        Ok(())
    }

    /// Subscribe to session changes. Dropping the returned guard unregisters
    /// the listener.
    pub fn subscribe(&self) -> SessionEvents {
        SessionEvents {
            receiver: self.events.subscribe(),
        }
    }
}

/// Scoped subscription to [`SessionEvent`] notifications
pub struct SessionEvents {
    receiver: broadcast::Receiver<SessionEvent>,
}

impl SessionEvents {
    /// Next session event, `None` once the [`Auth`] handle is gone
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("session listener lagged, skipped {skipped} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

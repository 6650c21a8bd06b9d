// SPDX-License-Identifier: GPL-3.0-only

use cardbox::core::auth::{Auth, UserIdentity};
use cardbox::core::client::StoreClient;

/// Fresh in-memory store with the schema applied
pub async fn client() -> StoreClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    StoreClient::connect_in_memory()
        .await
        .expect("in-memory store connects")
}

/// Auth handle with an open session for a default test user
pub async fn sign_in(client: &StoreClient) -> (Auth, UserIdentity) {
    let auth = Auth::new();
    let user = auth
        .sign_in(client, "student@example.com")
        .await
        .expect("sign in succeeds");

    (auth, user)
}

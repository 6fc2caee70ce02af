use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, spotify, types::AuthState};

pub async fn auth(shared_state: Arc<Mutex<Option<AuthState>>>) {
    if let Err(e) = spotify::auth::auth(shared_state).await {
        error!("Authentication failed: {}", e);
    }
}

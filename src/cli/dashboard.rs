use std::sync::Arc;

use crate::{error, server};

use super::load_session;

pub async fn dashboard() {
    let session = Arc::new(load_session().await);
    if let Err(e) = server::start_dashboard_server(session).await {
        error!("Dashboard server failed. Err: {}", e);
    }
}

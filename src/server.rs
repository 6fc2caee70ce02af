use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    Res, api, config, info,
    spotify::SpotifySession,
    types::AuthState,
};

/// Serves `/callback` and `/health` for the duration of the OAuth flow.
pub async fn start_callback_server(state: Arc<Mutex<Option<AuthState>>>) -> Res<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)));

    serve(app).await
}

/// Serves the dashboard at `/` until the process is stopped.
pub async fn start_dashboard_server(session: Arc<SpotifySession>) -> Res<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/", get(api::dashboard).layer(Extension(session)));

    info!("Dashboard running at http://{}/", config::server_addr());
    serve(app).await
}

async fn serve(app: Router) -> Res<()> {
    let addr = SocketAddr::from_str(&config::server_addr())?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

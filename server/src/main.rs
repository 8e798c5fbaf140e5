mod config;
mod routes;
mod services;
mod state;
mod transport;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("invalid configuration");
    let port = config.port;

    let state = state::AppState::new(config).expect("http client build failed");

    // Warm the session up front so the first record request does not pay
    // the full discovery + login cost. Failure here is non-fatal: the
    // session is recreated lazily on the next request.
    {
        let warmup = state.clone();
        tokio::spawn(async move {
            match warmup.sessions.ensure_active().await {
                Ok(session) => tracing::info!(session_id = %session.id, "startup login complete"),
                Err(e) => tracing::warn!(error = %e, "startup login failed — will retry on demand"),
            }
        });
    }

    let app = routes::app(state.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "paifu gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    state.sessions.teardown().await;
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // Identity backend config (non-fatal: auth endpoints answer 503 if missing).
    let identity = match services::identity::IdentityConfig::from_env() {
        Some(config) => {
            tracing::info!(base_url = %config.base_url, "identity backend configured");
            Some(config)
        }
        None => {
            tracing::warn!("identity backend not configured — auth endpoints disabled");
            None
        }
    };

    let state = state::AppState::new(pool, identity);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "atelier auth listening");
    axum::serve(listener, app).await.expect("server failed");
}

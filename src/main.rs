//! Server entry point: settings → store connection → router → serve.

use tracing_subscriber::EnvFilter;

use hemav_backend::api::{api_router, ApiContext};
use hemav_backend::auth::TokenService;
use hemav_backend::config::{Settings, APP_NAME, APP_VERSION};
use hemav_backend::db::{self, Collections};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env();
    tracing::info!("{APP_NAME} starting v{APP_VERSION}");

    let database = db::connect(&settings).await?;
    tracing::info!(db = settings.db_name, "MongoDB client initialized");

    let tokens = TokenService::from_settings(&settings)?;
    let bind_addr = settings.bind_addr.clone();
    let ctx = ApiContext::new(Collections::new(database), tokens, settings);
    let app = api_router(ctx);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

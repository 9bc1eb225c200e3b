use std::sync::Arc;

use mate_relay::{app_router, AppState, RelayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mate_relay=info".parse().expect("valid directive")),
        )
        .init();

    let config = Arc::new(RelayConfig::from_env()?);
    tracing::info!("Starting mate-relay with config: {:?}", config);

    let state = AppState::from_config(Arc::clone(&config)).await?;
    let router = app_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("mate-relay listening on {}", config.bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}

//! QuizViz API server

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizviz_api::{all_routes, AppState};
use quizviz_cache::CacheConfig;
use quizviz_gateway::{Gateway, GatewayConfig};
use quizviz_providers::ProvidersConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizviz=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let providers = ProvidersConfig::from_env().build_providers()?;
    let gateway = Arc::new(Gateway::new(
        providers,
        CacheConfig::from_env(),
        GatewayConfig::default(),
    ));

    let bind_addr =
        std::env::var("QUIZVIZ_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let app = all_routes().with_state(AppState::new(gateway));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "quizviz-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}

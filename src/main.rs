use std::net::SocketAddr;

use property_projection::api::{AppState, create_router};
use property_projection::config::ConfigLoader;
use tracing_subscriber::EnvFilter;

const DEFAULT_RULES_DIR: &str = "./config/au_2024_25";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let rules_dir = std::env::var("RULES_DIR").unwrap_or_else(|_| DEFAULT_RULES_DIR.to_string());
    let bind_addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()?;

    let config = ConfigLoader::load(&rules_dir)?;
    tracing::info!(
        rules_dir = %rules_dir,
        rule_set = %config.metadata().code,
        "Loaded rule set"
    );

    let router = create_router(AppState::new(config));
    tracing::info!("Listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

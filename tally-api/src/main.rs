use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tally_api::{app, app_config::Config, AppState};
use tally_catalog::PricingCatalog;
use tally_store::MemorySessionStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Tally API on port {}", config.server.port);

    // No catalog without at least one valid rule set.
    let catalog = PricingCatalog::load(&config.catalog.pricing_file)
        .expect("Failed to load pricing rules");

    let _refresh = match config.catalog.refresh_interval_seconds {
        0 => None,
        secs => Some(PricingCatalog::spawn_refresh(
            Arc::clone(&catalog),
            Duration::from_secs(secs),
        )),
    };

    let app_state = AppState {
        store: Arc::new(MemorySessionStore::new()),
        rules: catalog,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

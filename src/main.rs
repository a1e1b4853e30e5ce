use std::sync::Arc;

use hltracker::analysis::TradeAnalyzer;
use hltracker::api::router::create_router;
use hltracker::config::{AppConfig, StoreBackend};
use hltracker::hyperliquid::HyperliquidClient;
use hltracker::services::fill_poller::run_fill_poller;
use hltracker::store::{MemoryStore, PgStore, TradeStore};
use hltracker::{db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // sqlx and reqwest both pull in rustls; pick the provider explicitly.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);
    let metrics_handle = hltracker::metrics::init_metrics()?;

    let store: Arc<dyn TradeStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            tracing::info!("Connecting to database...");
            let pool = db::init_pool(url).await?;
            tracing::info!("Database connected, migrations applied");
            Arc::new(PgStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; tracked addresses and fills are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // --- Background poller: Hyperliquid info API → store ---
    if config.poller_enabled {
        let client = HyperliquidClient::new(reqwest::Client::new(), config.hyperliquid_info_url.clone());
        let poller_store = Arc::clone(&store);
        let interval_secs = config.poll_interval_secs;
        tokio::spawn(async move {
            run_fill_poller(client, poller_store, interval_secs).await;
        });
    } else {
        tracing::info!("Fill poller disabled (POLLER_ENABLED=false)");
    }

    tracing::info!(backend = %config.store_backend, "Trade store ready");

    let state = AppState {
        analyzer: TradeAnalyzer::new(store),
        config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}

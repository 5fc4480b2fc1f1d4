use std::time::Duration;

use astrokapsel::server::{config::Config, model::app::AppState, router, startup};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const WORKSPACE_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), astrokapsel::server::error::Error> {
    let db = startup::connect_to_database(&config).await?;
    let generation_client = startup::build_generation_client(&config)?;
    let session = startup::build_session_layer();

    let state = AppState::new(db, generation_client, &config);
    let _change_listener = state.workspaces.spawn_change_listener(&state.changes);
    let _eviction_sweeper = state
        .workspaces
        .spawn_eviction_sweeper(WORKSPACE_SWEEP_INTERVAL, config.workspace_idle_timeout());

    let app = router::routes().with_state(state).layer(session);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| {
            astrokapsel::server::error::Error::InternalError(format!(
                "Failed to bind {}: {}",
                config.bind_address, e
            ))
        })?;

    tracing::info!("Starting server on {}", config.bind_address);

    axum::serve(listener, app).await.map_err(|e| {
        astrokapsel::server::error::Error::InternalError(format!("Server error: {}", e))
    })
}

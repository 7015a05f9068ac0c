use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use timetable_server::cache::{CacheConfig, CachedScheduleClient};
use timetable_server::config::ServerConfig;
use timetable_server::schedule::{ScheduleClient, ScheduleConfig};
use timetable_server::store::{Snapshot, Store};
use timetable_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let client = ScheduleClient::new(ScheduleConfig::new().with_base_url(&config.schedule_url))?;
    let schedule =
        CachedScheduleClient::new(client, &CacheConfig::default().with_ttl(config.cache_ttl));

    let store = Store::open(Snapshot::new(&config.store_path)).await?;

    let state = AppState::new(schedule, store);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Timetable boards listening on http://{}", config.addr);
    info!("Open http://{} in your browser for the dashboard.", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}

use std::time::Duration;

use tracing::{error, info, warn};

use seat_watch::cache::CacheConfig;
use seat_watch::config::AppConfig;
use seat_watch::logger::init_logger;
use seat_watch::notify::DiscordNotifier;
use seat_watch::regiojet::RegioJetClient;
use seat_watch::scanner::{Scanner, ScannerConfig};
use seat_watch::stations::{StationClient, StationNames};
use seat_watch::store::MemoryWatchStore;
use seat_watch::web::{AppState, create_router};

/// How often to refresh station names (24 hours).
const STATION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    init_logger();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let upstream = RegioJetClient::new(config.regiojet()).expect("Failed to create RegioJet client");
    let notifier = DiscordNotifier::new(&config.currency, Duration::from_secs(config.timeout_secs))
        .expect("Failed to create Discord notifier");
    let store = MemoryWatchStore::new();

    // Fetch station names (fail fast if unavailable)
    info!("fetching station names");
    let station_client =
        StationClient::new(config.stations()).expect("Failed to create Station client");
    let station_names = StationNames::fetch(station_client)
        .await
        .expect("Failed to fetch station names");
    info!(count = station_names.len().await, "loaded station names");

    // Spawn background task to refresh station names daily
    let station_names_refresh = station_names.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(STATION_REFRESH_INTERVAL);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match station_names_refresh.refresh().await {
                Ok(count) => info!(count, "refreshed station names"),
                Err(e) => warn!(error = %e, "failed to refresh station names"),
            }
        }
    });

    let scanner_config = ScannerConfig::new(config.scan_interval)
        .with_notify_alternatives_with_direct(config.notify_alternatives_with_direct)
        .with_search(config.search())
        .with_cache(CacheConfig::default());
    let scanner = Scanner::new(
        store.clone(),
        upstream.clone(),
        notifier,
        station_names.clone(),
        scanner_config,
    );
    tokio::spawn(async move { scanner.run().await });

    let state = AppState::new(upstream, store, station_names, config.search());
    let app = create_router(state);

    info!(addr = %config.bind, "seat watchdog listening");
    info!("  GET  /health       - Health check");
    info!("  GET  /routes       - Bookable connections");
    info!("  POST /watchdog     - Watch a route");
    info!("  GET  /constants    - Station names");
    info!("  GET  /allSegments  - Seat-change alternatives");

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .expect("Failed to bind listener");
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server stopped");
    }
}

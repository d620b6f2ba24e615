use tracing::{error, info};

use horarios_server::adif::AdifClient;
use horarios_server::config::ServerConfig;
use horarios_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horarios_server=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    let stations = match config.load_stations() {
        Ok(stations) => stations,
        Err(e) => {
            error!("Failed to load station table: {e}");
            std::process::exit(1);
        }
    };
    info!("Loaded {} station slugs", stations.len());

    let adif = match AdifClient::new(config.adif.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create ADIF client: {e}");
            std::process::exit(1);
        }
    };

    info!(
        base_url = %config.adif.base_url,
        timeout_secs = config.adif.timeout_secs,
        network = %config.default_network,
        unmapped = ?config.unmapped,
        "ADIF client ready"
    );

    let state = AppState::new(adif, stations, config.default_network.clone(), config.unmapped);
    let app = create_router(state);

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("Horarios proxy listening on http://{addr}");
    info!("  GET /health");
    info!("  GET /api/horarios?codigo=<station>[&red=<network>]");
    info!("  GET /api/horarios/<station>[?red=<network>]");
    info!("  GET /api/estaciones");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

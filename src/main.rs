use log::info;
use std::process::ExitCode;

use bucketfm::web::{AppState, WebServer};
use bucketfm::Config;

fn config_path() -> String {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BUCKETFM_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let path = config_path();
    let config = match Config::load_with_env(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", path, e);
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = bucketfm::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        bucketfm::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("bucketfm {}", env!("CARGO_PKG_VERSION"));

    let store = bucketfm::connect_store(&config.storage).await;
    let state = AppState::new(store).with_download_options(bucketfm::download_options(&config.storage));

    let server = WebServer::new(&config.server, state);
    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

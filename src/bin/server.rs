use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use rusty_folio::config::ServerConfig;
use rusty_folio::core::{configured_providers, AppState};
use rusty_folio::handlers::routes;
use rusty_folio::security_logger::{init_security_logger, log_security_event, SecurityEvent};
use rusty_folio::storage::{create_memory_storage, MemoryTokenRevocationStore};

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    init_security_logger();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            log_security_event(SecurityEvent::ConfigurationError {
                component: "server".to_string(),
                error: e.to_string(),
            })
            .await;
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, tls={}, development_mode={}",
        config.host, config.port, config.enable_tls, config.development_mode
    );
    if config.development_mode {
        warn!("Development mode is on: session cookies are not marked Secure unless FOLIO_SECURE_COOKIES=true");
    }

    let storage = create_memory_storage();
    if let Err(e) = storage.initialize().await {
        error!("Failed to initialize storage: {}", e);
        std::process::exit(1);
    }

    let revocations = Arc::new(MemoryTokenRevocationStore::new());
    revocations.clone().start_cleanup_task();

    let providers = configured_providers(&config);
    let state = AppState::new(config.clone(), storage, revocations, providers);
    state.login_limiter.clone().start_cleanup_task();

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let server = warp::serve(routes(state));

    match (config.enable_tls, config.tls_cert_path, config.tls_key_path) {
        (true, Some(cert_path), Some(key_path)) => {
            info!("Starting Rusty Folio server on https://{}", addr);
            server
                .tls()
                .cert_path(cert_path)
                .key_path(key_path)
                .run(addr)
                .await;
        }
        _ => {
            info!("Starting Rusty Folio server on http://{}", addr);
            server.run(addr).await;
        }
    }
}

use glasshouse::app_config::AppConfig;
use glasshouse::directory_listener::{directory_listener, log_directory};
use glasshouse::directory_store::DirectoryStore;
use glasshouse::loader::load_directory;
use std::time::Duration;
use tokio::{signal, task, time};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt().with_max_level(config.core().log_level()).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("✅  Loaded configuration");

    let directory = load_directory(&config).await?;
    let store = DirectoryStore::new(directory);
    log_directory(0, &store.current(), config.frontend());
    info!("✅  Built device directory");

    let notifier_rx = store.notifier();
    let params = config.frontend().clone();
    task::spawn(async move {
        directory_listener(notifier_rx, params).await;
    });
    info!("✅  Initialized directory listener");

    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    match config.reload().interval() {
        Some(interval) => {
            tokio::select! {
                _ = reload_every(interval, &store, &config) => {}
                _ = signal::ctrl_c() => {}
            }
        }
        None => signal::ctrl_c().await?,
    }

    info!("👋 Shutting down");
    Ok(())
}

async fn reload_every(period: Duration, store: &DirectoryStore, config: &AppConfig) {
    let mut interval = time::interval(period);
    // The first tick completes immediately
    interval.tick().await;
    loop {
        interval.tick().await;
        if store.reload(config).await.is_err() {
            warn!("⚠️ Serving the previous directory until the next reload");
        }
    }
}

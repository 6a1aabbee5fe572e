use crate::app_config::AppConfig;
use crate::device_directory::DeviceDirectory;
use crate::loader::{LoaderError, load_directory};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::sync::watch::{Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{info, instrument, warn};

pub type DirectorySnapshot = Arc<DeviceDirectory>;

/// Holds the active directory. Readers get a consistent snapshot; a reload replaces it wholesale or not at all.
#[derive(Debug)]
pub struct DirectoryStore {
    notifier_tx: WatchSender<DirectorySnapshot>,
    notifier_rx: WatchReceiver<DirectorySnapshot>,
}

impl DirectoryStore {
    pub fn new(directory: DeviceDirectory) -> Self {
        let (notifier_tx, notifier_rx) = watch::channel::<DirectorySnapshot>(Arc::new(directory));
        DirectoryStore { notifier_tx, notifier_rx }
    }

    pub fn current(&self) -> DirectorySnapshot {
        self.notifier_rx.borrow().clone()
    }

    pub fn notifier(&self) -> WatchReceiver<DirectorySnapshot> {
        self.notifier_rx.clone()
    }

    pub fn publish(&self, directory: DeviceDirectory) {
        let num_devices = directory.len();
        self.notifier_tx.send_replace(Arc::new(directory));
        info!("🔵 Published directory with {} device(s)", num_devices);
    }

    /// Rebuilds the directory from the configured sources. The active directory is kept when anything fails.
    #[instrument(skip_all)]
    pub async fn reload(&self, config: &AppConfig) -> Result<(), LoaderError> {
        match load_directory(config).await {
            Ok(directory) => {
                self.publish(directory);
                Ok(())
            }
            Err(err) => {
                warn!("⚠️ Reload failed, keeping {} device(s): {}", self.current().len(), err);
                Err(err)
            }
        }
    }
}

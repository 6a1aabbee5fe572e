use crate::directory_store::DirectorySnapshot;
use crate::domain::directive::FrontendParams;
use tokio::sync::watch::Receiver;
use tracing::{debug, info, instrument};

#[instrument(skip_all)]
pub async fn directory_listener(mut rx: Receiver<DirectorySnapshot>, params: FrontendParams) {
    let mut generation: u64 = 0;
    while rx.changed().await.is_ok() {
        let snapshot: DirectorySnapshot = rx.borrow_and_update().clone();
        generation += 1;
        log_directory(generation, &snapshot, &params);
    }
}

pub fn log_directory(generation: u64, snapshot: &DirectorySnapshot, params: &FrontendParams) {
    let networks = snapshot.networks(params);
    info!(generation, "🗂️ Directory with {} device(s) in {} network(s) is active", snapshot.len(), networks.len());
    for network in &networks {
        debug!(generation, "🌐 {}: {}", network.display_name, network.locations.iter().map(|l| l.name.as_str()).collect::<Vec<_>>().join(", "));
    }
    for (plugin, ids) in snapshot.directive_plugins() {
        debug!(generation, "🔌 {} used by {}", plugin.display(), ids.join(", "));
    }
}

use crate::device_factory::factory::ConfigError;
use crate::device_factory::identity::Identity;
use crate::domain::network::Ssl;
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::warn;

/// Points an enabled SSL block without a certificate at `<directory>/<id>.pem`, creating an empty
/// placeholder when the file does not exist yet. A real certificate must be installed before TLS works.
pub fn default_certificate(device: &Identity, ssl: Option<Ssl>, directory: &Path) -> Result<Option<Ssl>, ConfigError> {
    let Some(mut ssl) = ssl else {
        return Ok(None);
    };
    if !ssl.enable || ssl.cert.is_some() {
        return Ok(Some(ssl));
    }

    let cert = directory.join(format!("{}.pem", device.id));
    if !cert.exists() {
        warn!("⚠️ No certificate found for device '{}', creating empty placeholder '{}'", device.name, cert.display());
        fs::create_dir_all(directory)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(&cert))
            .map_err(|source| ConfigError::Certificate {
                device: device.name.clone(),
                path: cert.clone(),
                source,
            })?;
    }

    ssl.cert = Some(cert);
    Ok(Some(ssl))
}

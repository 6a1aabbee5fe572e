use crate::device_factory::factory::{ConfigError, DeviceError};
use crate::platform_table::PlatformTable;
use tracing::debug;

/// Rewrites aliases to the canonical platform, then checks it is supported.
pub fn resolve_platform(device: &str, platform: Option<&str>, table: &PlatformTable) -> Result<String, DeviceError> {
    let platform = platform.ok_or_else(|| ConfigError::MissingPlatform { device: device.to_string() })?;

    let canonical = table.canonical(platform);
    if canonical != platform {
        debug!(device, "Rewriting platform '{}' to '{}'", platform, canonical);
    }

    if !table.is_supported(canonical) {
        return Err(DeviceError::UnsupportedDevice(canonical.to_string()));
    }

    Ok(canonical.to_string())
}

/// Requires `platform` to be canonical already.
pub fn resolve_structured_output(device: &str, platform: &str, requested: Option<bool>, table: &PlatformTable) -> Result<bool, ConfigError> {
    let supported = table.supports_structured_output(platform);
    match requested {
        Some(true) if !supported => Err(ConfigError::UnsupportedStructuredOutput {
            device: device.to_string(),
            platform: platform.to_string(),
        }),
        Some(requested) => Ok(requested),
        None => Ok(supported),
    }
}

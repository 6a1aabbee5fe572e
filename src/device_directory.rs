use crate::device_factory::{DeviceError, DeviceFactory};
use crate::domain::device::{ApiDevice, Device};
use crate::domain::directive::{DirectiveFrontend, FrontendParams};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// What to do when two definitions derive the same device id.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    LastWins,
}

/// All devices of one configuration generation, sorted by name. Never mutated after construction.
#[derive(Debug)]
pub struct DeviceDirectory {
    objects: Vec<Device>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl DeviceDirectory {
    /// Builds every definition in order. The first invalid definition aborts the whole build.
    #[instrument(skip_all, fields(definitions = definitions.len()))]
    pub fn build(definitions: Vec<serde_json::Value>, factory: &DeviceFactory, policy: DuplicatePolicy) -> Result<Self, DirectoryError> {
        info!("🗂️ Building device directory...");
        let devices = definitions
            .into_iter()
            .enumerate()
            .map(|(index, definition)| factory.from_value(definition).map_err(|source| DirectoryError::Device { index, source }))
            .collect::<Result<Vec<_>, _>>()?;

        let directory = Self::new(devices, policy)?;
        info!("🗂️ Building device directory... OK, {} device(s)", directory.len());
        Ok(directory)
    }

    pub fn new(devices: Vec<Device>, policy: DuplicatePolicy) -> Result<Self, DirectoryError> {
        let mut unique: HashMap<String, Device> = HashMap::with_capacity(devices.len());
        for device in devices {
            if let Some(existing) = unique.get(device.id()) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(DirectoryError::DuplicateId {
                            id: device.id().to_string(),
                            first: existing.name().to_string(),
                            second: device.name().to_string(),
                        });
                    }
                    DuplicatePolicy::LastWins => {
                        warn!("⚠️ Device '{}' replaces '{}', both resolve to id '{}'", device.name(), existing.name(), device.id());
                    }
                }
            }
            unique.insert(device.id().to_string(), device);
        }

        let mut objects: Vec<Device> = unique.into_values().collect();
        objects.sort_by(|a, b| a.name().cmp(b.name()));

        let by_id = objects.iter().enumerate().map(|(index, device)| (device.id().to_string(), index)).collect();
        let by_name = objects.iter().enumerate().map(|(index, device)| (device.name().to_string(), index)).collect();

        Ok(Self { objects, by_id, by_name })
    }

    pub fn objects(&self) -> &[Device] {
        &self.objects
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(Device::id)
    }

    pub fn hostnames(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(Device::name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Looks a device up by id, then by name.
    pub fn get(&self, accessor: &str) -> Result<&Device, DirectoryError> {
        self.by_id
            .get(accessor)
            .or_else(|| self.by_name.get(accessor))
            .map(|&index| &self.objects[index])
            .ok_or_else(|| DirectoryError::NotFound(accessor.to_string()))
    }

    pub fn export_api(&self) -> Vec<ApiDevice> {
        self.objects.iter().map(Device::export_api).collect()
    }

    /// Devices grouped by network display name, groups sorted by that name.
    pub fn networks(&self, params: &FrontendParams) -> Vec<NetworkGroup> {
        let mut groups: BTreeMap<&str, Vec<Location>> = BTreeMap::new();
        for device in &self.objects {
            groups.entry(device.network().display_name.as_str()).or_default().push(Location {
                id: device.id().to_string(),
                name: device.name().to_string(),
                network: device.network().display_name.clone(),
                directives: device.directives().iter().map(|directive| directive.frontend(params)).collect(),
            });
        }

        groups
            .into_iter()
            .map(|(display_name, locations)| NetworkGroup {
                display_name: display_name.to_string(),
                locations,
            })
            .collect()
    }

    /// Plugin file to the ids of every directive in use that loads it.
    pub fn directive_plugins(&self) -> BTreeMap<PathBuf, Vec<String>> {
        let mut plugins: BTreeMap<PathBuf, BTreeSet<String>> = BTreeMap::new();
        for directive in self.objects.iter().flat_map(|device| device.directives()) {
            for plugin in directive.plugins() {
                plugins.entry(PathBuf::from(plugin)).or_default().insert(directive.id().to_string());
            }
        }

        plugins.into_iter().map(|(plugin, ids)| (plugin, ids.into_iter().collect())).collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetworkGroup {
    pub display_name: String,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub network: String,
    pub directives: Vec<DirectiveFrontend>,
}

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("device #{index}: {source}")]
    Device { index: usize, source: DeviceError },
    #[error("devices '{first}' and '{second}' both resolve to id '{id}'")]
    DuplicateId { id: String, first: String, second: String },
    #[error("no device named '{0}'")]
    NotFound(String),
}
